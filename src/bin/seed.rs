use std::env;

use local_chef_bazaar::{
    client::{
        Bazaar,
        error::{ClientError, IdentityError},
        validation::{LoginForm, MealForm, RegisterForm},
    },
    config::ClientConfig,
    dto::params::MealListQuery,
    models::{RequestStatus, Role},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Account {
    name: &'static str,
    email: String,
    password: String,
}

// Seeds a running backend through the client: an admin (must be listed in
// the backend's ADMIN_EMAILS), one approved chef with meals, one customer.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,local_chef_bazaar=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    let password = env::var("SEED_PASSWORD").unwrap_or_else(|_| "Bazaar123".to_string());

    let admin = Account {
        name: "Bazaar Admin",
        email: env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@localchefbazaar.test".into()),
        password: password.clone(),
    };
    let chef = Account {
        name: "Maria Rossi",
        email: "chef@localchefbazaar.test".to_string(),
        password: password.clone(),
    };
    let customer = Account {
        name: "Sam Carter",
        email: config
            .demo_email
            .clone()
            .unwrap_or_else(|| "customer@localchefbazaar.test".into()),
        password: config.demo_password.clone().unwrap_or(password),
    };

    let admin_client = signed_in(&config, &admin).await?;
    if admin_client.current_role().await != Role::Admin {
        anyhow::bail!(
            "{} is not an admin; add it to ADMIN_EMAILS on the backend",
            admin.email
        );
    }

    let chef_client = signed_in(&config, &chef).await?;
    if chef_client.current_role().await != Role::Chef {
        promote_to_chef(&admin_client, &chef_client).await?;
    }
    seed_meals(&chef_client).await?;

    let customer_client = signed_in(&config, &customer).await?;

    let meals = customer_client.meals(MealListQuery::default()).await?;
    println!(
        "Seed completed. Admin: {}, chef: {}, customer: {}, meals listed: {}",
        admin.email, chef.email, customer.email, meals.total
    );

    for client in [admin_client, chef_client, customer_client] {
        client.shutdown().await;
    }
    Ok(())
}

/// Signs in, registering the account first when it does not exist yet.
async fn signed_in(config: &ClientConfig, account: &Account) -> anyhow::Result<Bazaar> {
    let bazaar = Bazaar::start_local(config.clone());
    bazaar.session().ready().await?;

    let login = LoginForm {
        email: account.email.clone(),
        password: account.password.clone(),
    };
    match bazaar.sign_in(&login).await {
        Ok(_) => {}
        Err(ClientError::Identity(IdentityError::InvalidCredentials)) => {
            let form = RegisterForm {
                name: account.name.to_string(),
                email: account.email.clone(),
                photo_url: None,
                password: account.password.clone(),
                confirm_password: account.password.clone(),
            };
            bazaar.sign_up(&form).await?;
        }
        Err(err) => return Err(err.into()),
    }

    let snapshot = bazaar.profile_settled().await?;
    tracing::info!(email = %account.email, sync = ?snapshot.profile_sync, "account ready");
    Ok(bazaar)
}

async fn promote_to_chef(admin: &Bazaar, chef: &Bazaar) -> anyhow::Result<()> {
    let request = match chef.request_role(Role::Chef).await {
        Ok(request) => Some(request),
        Err(ClientError::Backend { status: 400, .. }) => None,
        Err(err) => return Err(err.into()),
    };

    let email = chef.session().snapshot().email().unwrap_or_default().to_string();
    let pending = admin
        .role_requests()
        .await?
        .into_iter()
        .find(|r| r.user_email == email && r.status == RequestStatus::Pending)
        .or(request)
        .ok_or_else(|| anyhow::anyhow!("no pending chef request for {email}"))?;

    admin
        .resolve_role_request(pending.id, RequestStatus::Approved)
        .await?;
    chef.cache().clear();
    chef.session().refresh_profile().await?;
    tracing::info!(%email, "chef approved");
    Ok(())
}

async fn seed_meals(chef: &Bazaar) -> anyhow::Result<()> {
    let existing = chef.chef_meals().await?;
    let meals = [
        ("Pasta Alfredo", 250, "pasta, cream, parmesan, garlic", 40),
        ("Chicken Biryani", 320, "basmati rice, chicken, saffron, yogurt", 55),
        ("Vegetable Khichuri", 180, "rice, lentils, carrot, peas", 35),
        ("Beef Tehari", 300, "rice, beef, mustard oil, green chili", 50),
    ];

    for (name, price, ingredients, minutes) in meals {
        if existing.iter().any(|m| m.name == name) {
            continue;
        }
        let form = MealForm {
            name: name.to_string(),
            image_url: format!(
                "https://images.localchefbazaar.test/{}.jpg",
                name.to_lowercase().replace(' ', "-")
            ),
            price,
            ingredients: ingredients.to_string(),
            chef_experience: "8 years of home cooking".to_string(),
            delivery_area: "Dhanmondi".to_string(),
            estimated_delivery_minutes: minutes,
        };
        let meal = chef.create_meal(&form.validate()?).await?;
        tracing::info!(meal = %meal.name, price = meal.price, "meal seeded");
    }
    Ok(())
}
