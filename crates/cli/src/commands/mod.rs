pub mod assist;
pub mod serve;
