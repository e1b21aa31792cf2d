pub mod cat;
pub mod cd;
pub mod clear;
pub mod echo;
pub mod kttext;
pub mod ls;
pub mod wget;
