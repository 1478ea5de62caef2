mod snowflake;
mod worker;

pub use snowflake::*;
pub use worker::*;
