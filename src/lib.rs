pub mod amount;
pub mod csv;
pub mod engine;
pub mod input;
pub mod model;
pub mod receipt;
pub mod report;
pub mod session;

pub use amount::Amount;
pub use engine::{Allocation, allocate};
pub use model::{Charge, ChargeMode, LineItem, ParticipantId, TaxTip};
pub use session::{Edit, Session};
