//! One `SqlGenerator` per supported database.

pub mod db2;
pub mod derby;
pub mod duckdb;
pub mod h2;
pub mod hsqldb;
pub mod informix;
pub mod mariadb;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod redshift;
pub mod sqlite;
pub mod sqlserver;
pub mod standard;
