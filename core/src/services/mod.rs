//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    Clock, CodeIssuer, CodeValidator, DeliveryOutcome, EmailNotifierTrait,
    EmailVerificationService, ManualClock, SendCodeResult, SystemClock,
    VerificationServiceConfig,
};
