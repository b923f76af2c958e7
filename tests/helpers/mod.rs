#![allow(dead_code)]

use dosewise::catalog::import::{import_drugs, import_interactions};
use dosewise::catalog::types::{DrugRecord, InteractionRecord};
use dosewise::db;
use rusqlite::Connection;

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::schema::init_schema(&conn).unwrap();
    db::migrations::run_migrations(&conn).unwrap();
    conn
}

pub fn drug_record(id: &str, name: &str, instruction: &str, side_effects: &[&str]) -> DrugRecord {
    DrugRecord {
        id: Some(id.into()),
        name: Some(name.into()),
        instruction: Some(instruction.into()),
        side_effects: Some(side_effects.iter().map(|s| s.to_string()).collect()),
    }
}

pub fn interaction_record(description: &str, level: &str, drugs: &[&str]) -> InteractionRecord {
    InteractionRecord {
        description: Some(description.into()),
        risk_level: Some(level.into()),
        drugs: drugs.iter().map(|s| s.to_string()).collect(),
    }
}

/// Three drugs and three rules: a red pair, a yellow pair and a rule with no
/// drugs that the read path must never return.
pub fn seed(conn: &mut Connection) {
    import_drugs(
        conn,
        &[
            drug_record("d1", "阿司匹林", "每日一次", &["胃部不适"]),
            drug_record("d2", "华法林", "每日一次 餐前", &["出血"]),
            drug_record("d3", "阿莫西林", "一日两次", &[]),
        ],
    )
    .unwrap();
    import_interactions(
        conn,
        &[
            interaction_record("出血风险增加", "red", &["d1", "d2"]),
            interaction_record("需监测", "yellow", &["d1", "d3"]),
            interaction_record("无药物", "yellow", &[]),
        ],
    )
    .unwrap();
}
