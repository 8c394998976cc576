#![allow(dead_code)]

use local_chef_bazaar::{
    client::{
        Bazaar,
        validation::{MealForm, RegisterForm},
    },
    config::{AppConfig, ClientConfig},
    models::{Meal, RequestStatus, Role},
    routes::create_app,
    state::AppState,
};
use tokio::{net::TcpListener, task::JoinHandle};

pub const ADMIN_EMAIL: &str = "admin@bazaar.test";
pub const PASSWORD: &str = "Secret123";

/// Backend on an in-memory database, bound to an ephemeral port; stopped on
/// drop.
pub struct TestServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn spawn_backend() -> TestServer {
    let config = AppConfig::local("test-secret").with_admin(ADMIN_EMAIL);
    let state = AppState::connect(config).await.expect("connect database");
    let app = create_app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve backend");
    });
    TestServer {
        base_url: format!("http://{addr}"),
        handle,
    }
}

/// A client whose session has seen the startup notification.
pub async fn client(server: &TestServer) -> Bazaar {
    let bazaar = Bazaar::start_local(ClientConfig::new(&server.base_url));
    bazaar.session().ready().await.expect("session ready");
    bazaar
}

/// Registers `email` and waits until the profile sync has settled.
pub async fn signed_up(server: &TestServer, name: &str, email: &str) -> Bazaar {
    let bazaar = client(server).await;
    let form = RegisterForm {
        name: name.to_string(),
        email: email.to_string(),
        photo_url: None,
        password: PASSWORD.to_string(),
        confirm_password: PASSWORD.to_string(),
    };
    bazaar.sign_up(&form).await.expect("sign up");
    bazaar.profile_settled().await.expect("profile settled");
    bazaar
}

pub async fn admin(server: &TestServer) -> Bazaar {
    let admin = signed_up(server, "Admin", ADMIN_EMAIL).await;
    assert_eq!(admin.current_role().await, Role::Admin);
    admin
}

/// Registers a user and has `admin` approve their chef request.
pub async fn chef(server: &TestServer, admin: &Bazaar, name: &str, email: &str) -> Bazaar {
    let chef = signed_up(server, name, email).await;
    let request = chef.request_role(Role::Chef).await.expect("submit request");
    admin
        .resolve_role_request(request.id, RequestStatus::Approved)
        .await
        .expect("approve request");
    chef.cache().clear();
    chef.session().refresh_profile().await.expect("refresh profile");
    assert_eq!(chef.current_role().await, Role::Chef);
    chef
}

pub fn meal_form(name: &str, price: i64) -> MealForm {
    MealForm {
        name: name.to_string(),
        image_url: "https://images.bazaar.test/meal.jpg".to_string(),
        price,
        ingredients: "rice, lentils".to_string(),
        chef_experience: "5 years".to_string(),
        delivery_area: "Mirpur".to_string(),
        estimated_delivery_minutes: 30,
    }
}

pub async fn create_meal(chef: &Bazaar, name: &str, price: i64) -> Meal {
    let request = meal_form(name, price).validate().expect("valid meal form");
    chef.create_meal(&request).await.expect("create meal")
}
