use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::error::CompileError;
use crate::transpiler::sql::db2::Db2Generator;
use crate::transpiler::sql::derby::DerbyGenerator;
use crate::transpiler::sql::duckdb::DuckDbGenerator;
use crate::transpiler::sql::h2::H2Generator;
use crate::transpiler::sql::hsqldb::HsqldbGenerator;
use crate::transpiler::sql::informix::InformixGenerator;
use crate::transpiler::sql::mariadb::MariaDbGenerator;
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::oracle::OracleGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::redshift::RedshiftGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::sql::standard::StandardGenerator;
use crate::transpiler::traits::SqlGenerator;

static STANDARD: StandardGenerator = StandardGenerator;
static POSTGRES: PostgresGenerator = PostgresGenerator;
static REDSHIFT: RedshiftGenerator = RedshiftGenerator;
static DUCKDB: DuckDbGenerator = DuckDbGenerator;
static MYSQL: MysqlGenerator = MysqlGenerator;
static MARIADB: MariaDbGenerator = MariaDbGenerator;
static SQLITE: SqliteGenerator = SqliteGenerator;
static H2: H2Generator = H2Generator;
static HSQLDB: HsqldbGenerator = HsqldbGenerator;
static DERBY: DerbyGenerator = DerbyGenerator;
static ORACLE11: OracleGenerator = OracleGenerator::legacy();
static ORACLE12: OracleGenerator = OracleGenerator::new();
static SQLSERVER: SqlServerGenerator = SqlServerGenerator;
static INFORMIX: InformixGenerator = InformixGenerator;
static DB2: Db2Generator = Db2Generator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dialect {
    /// ANSI SQL with no vendor extensions.
    #[default]
    Standard,
    Postgres,
    Redshift,
    DuckDB,
    MySQL,
    MariaDB,
    SQLite,
    H2,
    HyperSQL,
    Derby,
    /// Oracle before 12c: 30 character identifiers, ROWNUM paging.
    Oracle11,
    Oracle12,
    SqlServer,
    Informix,
    Db2,
}

impl Dialect {
    pub fn generator(&self) -> &'static dyn SqlGenerator {
        match self {
            Dialect::Standard => &STANDARD,
            Dialect::Postgres => &POSTGRES,
            Dialect::Redshift => &REDSHIFT,
            Dialect::DuckDB => &DUCKDB,
            Dialect::MySQL => &MYSQL,
            Dialect::MariaDB => &MARIADB,
            Dialect::SQLite => &SQLITE,
            Dialect::H2 => &H2,
            Dialect::HyperSQL => &HSQLDB,
            Dialect::Derby => &DERBY,
            Dialect::Oracle11 => &ORACLE11,
            Dialect::Oracle12 => &ORACLE12,
            Dialect::SqlServer => &SQLSERVER,
            Dialect::Informix => &INFORMIX,
            Dialect::Db2 => &DB2,
        }
    }

    /// Canonical name, as accepted by `from_str`.
    pub fn name(&self) -> &'static str {
        self.generator().name()
    }

    pub fn all() -> &'static [Dialect] {
        &[
            Dialect::Standard,
            Dialect::Postgres,
            Dialect::Redshift,
            Dialect::DuckDB,
            Dialect::MySQL,
            Dialect::MariaDB,
            Dialect::SQLite,
            Dialect::H2,
            Dialect::HyperSQL,
            Dialect::Derby,
            Dialect::Oracle11,
            Dialect::Oracle12,
            Dialect::SqlServer,
            Dialect::Informix,
            Dialect::Db2,
        ]
    }

    fn from_alias(name: &str) -> Option<Self> {
        let d = match name {
            "standard" | "ansi" | "sql" => Dialect::Standard,
            "postgres" | "postgresql" | "pg" => Dialect::Postgres,
            "redshift" => Dialect::Redshift,
            "duckdb" | "duck" => Dialect::DuckDB,
            "mysql" => Dialect::MySQL,
            "mariadb" | "maria" => Dialect::MariaDB,
            "sqlite" | "sqlite3" => Dialect::SQLite,
            "h2" => Dialect::H2,
            "hsqldb" | "hypersql" | "hsql" => Dialect::HyperSQL,
            "derby" | "javadb" => Dialect::Derby,
            "oracle11" | "oracle11g" => Dialect::Oracle11,
            "oracle" | "oracle12" | "oracle12c" => Dialect::Oracle12,
            "sqlserver" | "mssql" | "tsql" => Dialect::SqlServer,
            "informix" => Dialect::Informix,
            "db2" => Dialect::Db2,
            _ => return None,
        };
        Some(d)
    }
}

impl FromStr for Dialect {
    type Err = CompileError;

    /// Case-insensitive; `-`, `_` and spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        if let Some(d) = Self::from_alias(&key) {
            return Ok(d);
        }
        let suggestion = Self::all()
            .iter()
            .map(|d| (levenshtein(&key, d.name()), d.name()))
            .filter(|(dist, _)| *dist <= 3)
            .min_by_key(|(dist, _)| *dist)
            .map(|(_, name)| name.to_string());
        Err(CompileError::UnknownDialect {
            name: s.to_string(),
            suggestion,
        })
    }
}

impl TryFrom<String> for Dialect {
    type Error = CompileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Dialect> for String {
    fn from(d: Dialect) -> String {
        d.name().to_string()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_round_trips() {
        for d in Dialect::all() {
            assert_eq!(d.name().parse::<Dialect>().unwrap(), *d);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("ms-sql".parse::<Dialect>().unwrap(), Dialect::SqlServer);
        assert_eq!("Oracle".parse::<Dialect>().unwrap(), Dialect::Oracle12);
    }

    #[test]
    fn test_unknown_suggests_closest() {
        match "postgress".parse::<Dialect>() {
            Err(CompileError::UnknownDialect { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("postgres"))
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            "cobol".parse::<Dialect>(),
            Err(CompileError::UnknownDialect { suggestion: None, .. })
        ));
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&Dialect::SqlServer).unwrap();
        assert_eq!(json, "\"sqlserver\"");
        let back: Dialect = serde_json::from_str("\"duckdb\"").unwrap();
        assert_eq!(back, Dialect::DuckDB);
    }
}
