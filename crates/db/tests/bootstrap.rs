use sqlx::PgPool;

/// Connect, migrate and verify the tracker tables exist.
#[sqlx::test(migrations = "./migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    placement_db::health_check(&pool).await.unwrap();

    let tables = [
        "batches",
        "students",
        "drives",
        "rounds",
        "participations",
        "round_outcomes",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}
