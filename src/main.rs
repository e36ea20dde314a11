mod config;
mod errors;
mod handlers;
mod models;
mod services;

use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use services::{
    booking::BookingService, database::DatabaseService, notification::NotificationService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = config::Config::from_env();

    let database_service = DatabaseService::new();
    let notification_service = NotificationService::new(database_service.clone());
    let booking_service =
        BookingService::new(database_service.clone(), notification_service.clone());

    let bind_address = config.bind_address();
    log::info!("Starting booking API server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .app_data(Data::new(database_service.clone()))
            .app_data(Data::new(notification_service.clone()))
            .app_data(Data::new(booking_service.clone()))
            .service(
                web::scope("/api/v1")
                    // Profiles & auth
                    .service(
                        web::scope("/profiles")
                            .service(handlers::profiles::register_profile)
                            .service(handlers::profiles::get_profile),
                    )
                    // Service listings
                    .service(
                        web::scope("/services")
                            .service(handlers::services::create_service)
                            .service(handlers::services::list_freelancer_services),
                    )
                    // Availability slots
                    .service(
                        web::scope("/availability")
                            .service(handlers::availability::add_slot)
                            .service(handlers::availability::list_freelancer_slots)
                            .service(handlers::availability::remove_slot),
                    )
                    // Booking lifecycle
                    .service(
                        web::scope("/bookings")
                            .service(handlers::bookings::create_booking)
                            .service(handlers::bookings::update_booking_status)
                            .service(handlers::bookings::list_my_bookings),
                    )
                    // Notification inbox
                    .service(
                        web::scope("/notifications")
                            .service(handlers::notifications::list_notifications)
                            .service(handlers::notifications::mark_notification_read),
                    )
                    // Health check
                    .route("/health", web::get().to(handlers::health::health_check)),
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}
