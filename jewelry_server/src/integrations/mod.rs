//! Adapters that connect the engine's collaborator traits to the outside world.
//!
//! * [`payme::PaymeGateway`] opens sales with PayMe.
//! * [`mailer`] holds the e-mail transports.
//! * [`email::create_email_event_hooks`] wires the e-mail notifications to the engine's events.
pub mod email;
pub mod mailer;
pub mod payme;
