pub mod booking;
pub mod payment;
pub mod salon;
pub mod user;

pub use booking::{Booking, BookingServiceLine, BookingStatus, PaymentMethod, PaymentStatus};
pub use payment::{Payment, PaymentState};
pub use salon::{Gender, Salon, Service};
pub use user::{Otp, User};
