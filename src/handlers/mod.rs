// Route handlers. Reads are public; writes sit behind `ensure_admin`
// (see `crate::app`).
pub mod companies;
pub mod health;
pub mod jobs;
pub mod utils;
