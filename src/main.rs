use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use sentry::integrations::log::SentryLogger;

use pushkind_market::config::ServerConfig;
use pushkind_market::db::establish_connection_pool;
use pushkind_market::feed::HttpCatalogFetcher;
use pushkind_market::notifications::mailer::{LogMailer, Mailer, SmtpMailer};
use pushkind_market::notifications::templates::EmailTemplates;
use pushkind_market::notifications::{NotificationProcessor, NotificationSettings, start_workers};
use pushkind_market::repository::DieselRepository;
use pushkind_market::routes::{
    cart, catalog, contacts, images, json_error_handler, orders, partner, user,
};
use pushkind_market::throttle::Throttles;

const RETRY_DELAY: Duration = Duration::from_secs(5);
const THROTTLE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

fn init_logging() {
    let logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .build();
    let max_level = logger.filter();
    let logger = SentryLogger::with_dest(logger);

    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }
}

fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    log::info!("Sentry initialized");
    Some(guard)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load .env file
    init_logging();

    let server_config = ServerConfig::from_env();
    let _sentry_guard = init_sentry(&server_config);

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let templates = match EmailTemplates::new() {
        Ok(templates) => templates,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    let mailer: Arc<dyn Mailer> = match &server_config.smtp {
        Some(smtp) => match SmtpMailer::new(smtp, &server_config.email_from) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                log::error!("Failed to configure SMTP transport: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("SMTP_HOST is not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let processor = NotificationProcessor::new(
        repo.clone(),
        mailer,
        templates,
        NotificationSettings {
            admin_email: server_config.admin_email.clone(),
            retry_delay: RETRY_DELAY,
        },
    );
    let (queue, workers) = start_workers(processor, server_config.notification_workers)?;

    let fetcher = match HttpCatalogFetcher::new(server_config.feed_timeout) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            log::error!("Failed to build feed client: {e}");
            std::process::exit(1);
        }
    };

    let throttles = web::Data::new(Throttles::new(&server_config.throttle));
    let cleanup = throttles.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(THROTTLE_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            cleanup.retain_recent();
        }
    });

    if let Err(e) = std::fs::create_dir_all(Path::new(&server_config.media_root)) {
        log::error!("Failed to create media root {}: {e}", server_config.media_root);
        std::process::exit(1);
    }

    let address = server_config.address.clone();
    let port = server_config.port;
    let media_root = server_config.media_root.clone();
    let server_config = web::Data::new(server_config);
    let repo = web::Data::new(repo);
    let app_queue = web::Data::new(queue.clone());
    let fetcher = web::Data::new(fetcher);

    log::info!("Listening on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/media", &media_root))
            .service(
                web::scope("/api")
                    .service(user::register)
                    .service(user::confirm)
                    .service(user::login)
                    .service(user::details)
                    .service(catalog::list_products)
                    .service(catalog::list_categories)
                    .service(catalog::list_shops)
                    .service(cart::show_cart)
                    .service(cart::add_items)
                    .service(cart::update_items)
                    .service(cart::delete_items)
                    .service(contacts::list_contacts)
                    .service(contacts::create_contact)
                    .service(contacts::update_contact)
                    .service(contacts::delete_contacts)
                    .service(contacts::promote_contact)
                    .service(orders::list_orders)
                    .service(orders::show_order)
                    .service(orders::checkout)
                    .service(orders::cancel_order)
                    .service(partner::show_state)
                    .service(partner::update_state)
                    .service(partner::update_catalog)
                    .service(partner::list_orders)
                    .service(partner::advance_order)
                    .service(images::list_images)
                    .service(images::upload_image)
                    .service(images::show_image)
                    .service(images::update_image)
                    .service(images::delete_image)
                    .service(images::set_main_image),
            )
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(repo.clone())
            .app_data(app_queue.clone())
            .app_data(fetcher.clone())
            .app_data(throttles.clone())
            .app_data(server_config.clone())
    })
    .bind((address, port))?
    .run()
    .await?;

    // Closing the queue lets the workers drain pending emails and exit.
    drop(queue);
    workers.join();

    Ok(())
}
