use local_chef_bazaar::{
    client::{
        error::ClientError,
        validation::{
            LoginForm, MealForm, RegisterForm, ReviewForm, is_valid_email, validate_order,
        },
    },
    models::{MAX_MEAL_PRICE, MAX_ORDER_QUANTITY, order_total},
};
use uuid::Uuid;

fn field_errors(result: Result<(), ClientError>) -> Vec<(&'static str, String)> {
    match result {
        Ok(()) => Vec::new(),
        Err(ClientError::Validation(errors)) => errors
            .fields
            .into_iter()
            .map(|f| (f.field, f.message))
            .collect(),
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}

fn register(password: &str, confirm: &str) -> RegisterForm {
    RegisterForm {
        name: "Sam".to_string(),
        email: "sam@bazaar.test".to_string(),
        photo_url: None,
        password: password.to_string(),
        confirm_password: confirm.to_string(),
    }
}

#[test]
fn email_pattern() {
    assert!(is_valid_email("sam@bazaar.test"));
    assert!(is_valid_email("  first.last+tag@mail.example.com "));
    assert!(!is_valid_email("sam@bazaar"));
    assert!(!is_valid_email("sam bazaar@test.com"));
    assert!(!is_valid_email(""));
}

#[test]
fn password_policy_and_confirmation() {
    assert!(field_errors(register("Secret1", "Secret1").validate()).is_empty());

    let errors = field_errors(register("Ab1", "Ab1").validate());
    assert_eq!(
        errors,
        [("password", "Password must be at least 6 characters".to_string())]
    );

    let errors = field_errors(register("secret1", "secret1").validate());
    assert_eq!(
        errors,
        [("password", "Password must contain an uppercase letter".to_string())]
    );

    let errors = field_errors(register("SECRET1", "SECRET1").validate());
    assert_eq!(
        errors,
        [("password", "Password must contain a lowercase letter".to_string())]
    );

    let errors = field_errors(register("Secret1", "Secret2").validate());
    assert_eq!(
        errors,
        [("confirm_password", "Passwords do not match".to_string())]
    );
}

#[test]
fn required_fields_are_reported_together() {
    let form = RegisterForm {
        name: " ".to_string(),
        email: String::new(),
        ..register("Secret1", "Secret1")
    };
    let fields: Vec<_> = field_errors(form.validate())
        .into_iter()
        .map(|(field, _)| field)
        .collect();
    assert_eq!(fields, ["name", "email"]);

    let login = LoginForm {
        email: "not-an-email".to_string(),
        password: String::new(),
    };
    let errors = field_errors(login.validate());
    assert_eq!(errors.len(), 2);
}

#[test]
fn review_order_and_meal_forms() {
    let review = ReviewForm {
        rating: 0,
        comment: "Great".to_string(),
    };
    assert!(review.to_create(Uuid::new_v4()).is_err());

    let review = ReviewForm {
        rating: 5,
        comment: "  Great  ".to_string(),
    };
    assert_eq!(review.to_update().map(|r| r.comment), Ok("Great".to_string()));

    let meal_id = Uuid::new_v4();
    assert!(validate_order(meal_id, 0, "Road 1").is_err());
    assert!(validate_order(meal_id, 2, "   ").is_err());
    let order = validate_order(meal_id, 2, " Road 1 ").expect("valid order");
    assert_eq!(order.address, "Road 1");

    let meal = MealForm {
        name: "Pasta Alfredo".to_string(),
        image_url: "https://images.bazaar.test/pasta.jpg".to_string(),
        price: 250,
        ingredients: "pasta, cream, , parmesan".to_string(),
        chef_experience: "5 years".to_string(),
        delivery_area: "Banani".to_string(),
        estimated_delivery_minutes: 40,
    };
    let request = meal.validate().expect("valid meal");
    assert_eq!(request.ingredients, ["pasta", "cream", "parmesan"]);

    let invalid = MealForm {
        price: 0,
        ingredients: String::new(),
        ..meal
    };
    let Err(ClientError::Validation(errors)) = invalid.validate() else {
        panic!("expected validation errors");
    };
    assert!(errors.get("price").is_some());
    assert!(errors.get("ingredients").is_some());
}

#[test]
fn prices_and_quantities_are_bounded() {
    let meal = MealForm {
        name: "Saffron Biryani".to_string(),
        image_url: "https://images.bazaar.test/biryani.jpg".to_string(),
        price: MAX_MEAL_PRICE + 1,
        ingredients: "rice, saffron".to_string(),
        chef_experience: "8 years".to_string(),
        delivery_area: "Gulshan".to_string(),
        estimated_delivery_minutes: 45,
    };
    let Err(ClientError::Validation(errors)) = meal.validate() else {
        panic!("expected validation errors");
    };
    assert!(errors.get("price").is_some());

    let meal_id = Uuid::new_v4();
    assert!(validate_order(meal_id, MAX_ORDER_QUANTITY, "Road 1").is_ok());
    let Err(ClientError::Validation(errors)) =
        validate_order(meal_id, MAX_ORDER_QUANTITY + 1, "Road 1")
    else {
        panic!("expected validation errors");
    };
    assert!(errors.get("quantity").is_some());

    assert_eq!(order_total(250, 2), Some(500));
    assert_eq!(order_total(i64::MAX, 2), None);
    let largest = order_total(MAX_MEAL_PRICE, MAX_ORDER_QUANTITY).expect("in range");
    assert!(largest.checked_mul(100).is_some());
}
