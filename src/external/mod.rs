pub mod gateway;
pub mod mailer;
pub mod twilio;

pub use gateway::DeliveryGateway;
pub use mailer::MailerService;
pub use twilio::TwilioService;
