// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn migrate_twice_is_idempotent() {
    let conn = Connection::open_in_memory().expect("open");
    migrate(&conn).expect("first migrate");
    migrate(&conn).expect("second migrate");

    let count: i64 = conn
        .query_row(
            "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='events'",
            [],
            |row| row.get(0),
        )
        .expect("query");
    assert_eq!(count, 1);
}

#[test]
fn both_tables_exist_after_migrate() {
    let conn = Connection::open_in_memory().expect("open");
    migrate(&conn).expect("migrate");
    for table in ["events", "snapshots"] {
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .expect("query");
        assert_eq!(count, 1, "missing table {table}");
    }
}
