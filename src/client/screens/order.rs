use uuid::Uuid;

use crate::{
    client::{
        Bazaar,
        error::{ClientError, ClientResult, ValidationErrors},
        gate::{GateDecision, Route},
        screens::Loadable,
        validation,
    },
    models::{Meal, Order, User, order_total},
};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    pub meal: Meal,
    pub quantity: u32,
    pub address: String,
}

impl OrderForm {
    /// Starts at quantity 1 with the address from the profile, if any.
    pub fn new(meal: Meal, profile: Option<&User>) -> Self {
        Self {
            meal,
            quantity: 1,
            address: profile
                .and_then(|p| p.address.clone())
                .unwrap_or_default(),
        }
    }

    /// `None` when the quantity pushes the total out of range.
    pub fn total(&self) -> Option<i64> {
        order_total(self.meal.price, self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderScreen {
    pub decision: GateDecision,
    pub meal: Loadable<Meal>,
    pub form: Option<OrderForm>,
}

impl OrderScreen {
    /// Runs the route gate first; the meal is only fetched when the screen
    /// may render.
    pub async fn open(bazaar: &Bazaar, meal_id: Uuid) -> Self {
        let decision = bazaar.gate(&Route::Order(meal_id)).await;
        if decision != GateDecision::Render {
            return Self {
                decision,
                meal: Loadable::Loading,
                form: None,
            };
        }

        let profile = bazaar.session().snapshot().profile;
        let meal = Loadable::from(bazaar.meal(meal_id).await);
        let form = meal
            .ready()
            .map(|m| OrderForm::new(m.clone(), profile.as_ref()));
        Self {
            decision,
            meal,
            form,
        }
    }

    /// Runs the gate again with a fresh profile before posting; the backend
    /// refuses fraud customers as well.
    pub async fn submit(&self, bazaar: &Bazaar) -> ClientResult<Order> {
        let Some(form) = &self.form else {
            let mut errors = ValidationErrors::default();
            errors.add("meal", "Meal is not loaded");
            return Err(ClientError::Validation(errors));
        };
        match bazaar.gate(&Route::Order(form.meal.id)).await {
            GateDecision::Render => {}
            GateDecision::Blocked { reason } => {
                let mut errors = ValidationErrors::default();
                errors.add("account", reason);
                return Err(ClientError::Validation(errors));
            }
            _ => return Err(ClientError::Unauthenticated),
        }

        let request = validation::validate_order(form.meal.id, form.quantity, &form.address)?;
        bazaar.place_order(&request).await
    }
}
