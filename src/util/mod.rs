pub mod lark;
pub mod retry;
