pub mod applicationdb;
pub mod db;
pub mod jobdb;
pub mod reviewdb;
pub mod userdb;
