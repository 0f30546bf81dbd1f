use std::sync::Mutex;

use serde_json::json;

use pushkind_market::domain::user::{AuthenticatedUser, UserRole};
use pushkind_market::feed::{CatalogFetcher, FetchError};
use pushkind_market::forms::auth::{ConfirmForm, LoginForm, RegisterForm};
use pushkind_market::forms::cart::AddCartItemsForm;
use pushkind_market::forms::orders::CheckoutForm;
use pushkind_market::forms::partner::PartnerUpdateForm;
use pushkind_market::notifications::{Notification, NotificationDispatcher, NotificationError};
use pushkind_market::repository::{DieselRepository, ProductReader, UserReader};
use pushkind_market::services::{ServiceError, auth, cart, catalog, orders, partner};

mod common;

const ACME_FEED: &str = r#"
shop: Acme
categories:
  - id: 224
    name: Смартфоны
  - id: 15
    name: Аксессуары
goods:
  - id: 4216292
    category: 224
    model: apple/iphone/xs-max
    name: Смартфон Apple iPhone XS Max 512GB (золотистый)
    price: 110000
    price_rrc: 116990
    quantity: 14
    parameters:
      "Диагональ (дюйм)": 6.5
      "Разрешение (пикс)": 2688x1242
      "Встроенная память (Гб)": 512
      "Цвет": золотистый
  - id: 4216313
    category: 224
    model: apple/iphone/xr
    name: Смартфон Apple iPhone XR 256GB (красный)
    price: 65000
    price_rrc: 69990
    quantity: 9
    parameters:
      "Цвет": красный
  - id: 4672670
    category: 15
    model: apple/case
    name: Чехол Apple
    price: 1500
    price_rrc: 1990
    quantity: 30
    parameters: {}
"#;

/// Records every queued job instead of sending it.
#[derive(Default)]
struct RecordingDispatcher {
    jobs: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher {
    fn jobs(&self) -> Vec<Notification> {
        self.jobs.lock().expect("dispatcher lock").clone()
    }
}

impl NotificationDispatcher for RecordingDispatcher {
    fn dispatch(&self, notification: Notification) -> Result<(), NotificationError> {
        self.jobs.lock().expect("dispatcher lock").push(notification);
        Ok(())
    }
}

/// Dispatcher whose queue is gone.
struct ClosedDispatcher;

impl NotificationDispatcher for ClosedDispatcher {
    fn dispatch(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Disconnected)
    }
}

struct StaticFetcher(&'static str);

impl CatalogFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
        Ok(self.0.to_string())
    }
}

fn register_form(email: &str) -> RegisterForm {
    serde_json::from_value(json!({
        "email": email,
        "password": "Sup3r-secret",
        "password_confirm": "Sup3r-secret",
        "first_name": "Иван",
        "last_name": "Петров",
        "company": "ООО Ромашка",
        "position": "закупщик",
    }))
    .expect("valid register form")
}

fn as_authenticated(user: &pushkind_market::domain::user::User) -> AuthenticatedUser {
    AuthenticatedUser::from(user)
}

#[test]
fn mismatched_confirmation_creates_no_user() {
    let test_db = common::TestDb::new("service_register_mismatch.db");
    let repo = DieselRepository::new(test_db.pool());
    let dispatcher = RecordingDispatcher::default();

    let mut form = register_form("olga@example.com");
    form.password_confirm = "Sup3r-secret!".to_string();
    assert!(matches!(
        auth::register(&repo, &dispatcher, form),
        Err(ServiceError::Form(_))
    ));
    assert!(repo.get_user_by_email("olga@example.com").unwrap().is_none());
    assert!(dispatcher.jobs().is_empty());
}

#[test]
fn register_confirm_and_login() {
    let test_db = common::TestDb::new("service_register_confirm_login.db");
    let repo = DieselRepository::new(test_db.pool());
    let dispatcher = RecordingDispatcher::default();

    let user = auth::register(&repo, &dispatcher, register_form("Ivan@Example.com")).unwrap();
    assert_eq!(user.email, "ivan@example.com");
    assert_eq!(user.role, UserRole::Buyer);
    assert!(!user.is_active);
    assert_eq!(
        dispatcher.jobs(),
        vec![Notification::RegistrationConfirmation { user_id: user.id }]
    );

    let login = LoginForm {
        email: "ivan@example.com".to_string(),
        password: "Sup3r-secret".to_string(),
    };
    assert!(matches!(
        auth::login(&repo, login),
        Err(ServiceError::InactiveAccount)
    ));

    let duplicate = auth::register(&repo, &dispatcher, register_form("ivan@example.com"));
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));

    let key = repo
        .get_confirm_email_token(user.id)
        .unwrap()
        .expect("pending token")
        .key;
    let wrong = ConfirmForm {
        email: "ivan@example.com".to_string(),
        token: "nope".to_string(),
    };
    assert!(matches!(
        auth::confirm_email(&repo, wrong),
        Err(ServiceError::Form(_))
    ));
    let confirmed = auth::confirm_email(
        &repo,
        ConfirmForm {
            email: "ivan@example.com".to_string(),
            token: key,
        },
    )
    .unwrap();
    assert!(confirmed.is_active);

    let bad_password = LoginForm {
        email: "ivan@example.com".to_string(),
        password: "wrong-password".to_string(),
    };
    assert!(matches!(
        auth::login(&repo, bad_password),
        Err(ServiceError::InvalidCredentials)
    ));

    let login = auth::login(
        &repo,
        LoginForm {
            email: "IVAN@example.com".to_string(),
            password: "Sup3r-secret".to_string(),
        },
    )
    .unwrap();
    let resolved = auth::authenticate(&repo, &login.token).unwrap();
    assert_eq!(resolved.id, user.id);
    assert!(matches!(
        auth::authenticate(&repo, "unknown"),
        Err(ServiceError::InvalidCredentials)
    ));
}

#[test]
fn registration_survives_a_closed_queue() {
    let test_db = common::TestDb::new("service_register_closed_queue.db");
    let repo = DieselRepository::new(test_db.pool());

    let user = auth::register(&repo, &ClosedDispatcher, register_form("shop@example.com")).unwrap();
    assert!(repo.get_user_by_id(user.id).unwrap().is_some());
}

#[actix_web::test]
async fn feed_import_then_order_flow() {
    let test_db = common::TestDb::new("service_feed_order_flow.db");
    let repo = DieselRepository::new(test_db.pool());
    let dispatcher = RecordingDispatcher::default();
    let vendor = as_authenticated(&common::create_user(&repo, "acme@example.com", UserRole::Shop));
    let buyer = as_authenticated(&common::create_user(&repo, "buyer@example.com", UserRole::Buyer));

    let form = PartnerUpdateForm {
        url: Some("https://example.com/acme.yaml".to_string()),
    };
    let summary = partner::update_catalog(&repo, &StaticFetcher(ACME_FEED), &vendor, form)
        .await
        .unwrap();
    assert_eq!(summary.categories, 2);
    assert_eq!(summary.listings, 3);
    assert_eq!(summary.parameters, 5);

    let shops = catalog::list_shops(&repo).unwrap();
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0].name, "Acme");

    let page = catalog::list_products(
        &repo,
        catalog::ProductsQuery {
            category_id: Some(224),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(page.items.len(), 2);
    let phone = page
        .items
        .iter()
        .find(|item| item.external_id == Some(4216292))
        .expect("imported phone");
    assert!(repo.get_product_info(phone.id).unwrap().is_some());

    let added = cart::add_items(
        &repo,
        &buyer,
        AddCartItemsForm {
            items: Some(json!(format!(
                r#"[{{"product_id": {}, "quantity": 2}}]"#,
                phone.id
            ))),
        },
    )
    .unwrap();
    assert_eq!(added, 1);

    let cart_view = cart::get_cart(&repo, &buyer).unwrap().expect("cart");
    assert_eq!(cart_view.total, 220_000);

    let order = orders::checkout(
        &repo,
        &dispatcher,
        &buyer,
        CheckoutForm {
            id: cart_view.order.id,
            contact: None,
        },
    )
    .unwrap();
    assert_eq!(
        dispatcher.jobs(),
        vec![
            Notification::OrderConfirmation { order_id: order.id },
            Notification::AdminInvoice { order_id: order.id },
        ]
    );

    let repeat = orders::checkout(
        &repo,
        &dispatcher,
        &buyer,
        CheckoutForm {
            id: cart_view.order.id,
            contact: None,
        },
    );
    assert!(matches!(repeat, Err(ServiceError::NotFound)));

    let incoming = partner::list_orders(&repo, &vendor, Default::default()).unwrap();
    assert_eq!(incoming.items.len(), 1);
    assert_eq!(incoming.items[0].total, 220_000);

    let placed = orders::list_orders(&repo, &buyer, Default::default()).unwrap();
    assert_eq!(placed.items.len(), 1);
    assert_eq!(placed.total_pages, 1);

    let canceled = orders::cancel_order(&repo, &buyer, order.id).unwrap();
    assert_eq!(
        canceled.status,
        pushkind_market::domain::order::OrderStatus::Canceled
    );
}

#[actix_web::test]
async fn broken_feed_keeps_previous_catalog() {
    let test_db = common::TestDb::new("service_broken_feed.db");
    let repo = DieselRepository::new(test_db.pool());
    let vendor = as_authenticated(&common::create_user(&repo, "acme@example.com", UserRole::Shop));
    let url = || PartnerUpdateForm {
        url: Some("https://example.com/acme.yaml".to_string()),
    };

    partner::update_catalog(&repo, &StaticFetcher(ACME_FEED), &vendor, url())
        .await
        .unwrap();

    let broken = "shop: Acme\ncategories:\n  - {id: 224, name: Смартфоны}\ngoods:\n  - {category: 224, name: Phone, price: -1, price_rrc: 1, quantity: 1}\n";
    let result = partner::update_catalog(&repo, &StaticFetcher(broken), &vendor, url()).await;
    assert!(matches!(result, Err(ServiceError::Form(_))));

    let unknown_category = "shop: Acme\ncategories: []\ngoods:\n  - {category: 999, name: Phone, price: 1, price_rrc: 1, quantity: 1}\n";
    let result =
        partner::update_catalog(&repo, &StaticFetcher(unknown_category), &vendor, url()).await;
    assert!(matches!(result, Err(ServiceError::Form(_))));

    let page = catalog::list_products(&repo, Default::default()).unwrap();
    assert_eq!(page.items.len(), 3);
}
