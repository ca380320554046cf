use nodup_config::Qdrant;
use nodup_domain::record::RecordId;
use nodup_storage::{models::PointPayload, qdrant::QdrantStore};
use nodup_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres and Qdrant. Set NODUP_PG_DSN and NODUP_QDRANT_URL to run."]
async fn upserted_point_is_nearest_with_vector_and_payload() {
	let (Some(base_dsn), Some(qdrant_url)) =
		(nodup_testkit::env_dsn(), nodup_testkit::env_qdrant_url())
	else {
		eprintln!(
			"Skipping upserted_point_is_nearest_with_vector_and_payload; set NODUP_PG_DSN and NODUP_QDRANT_URL to run."
		);

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Qdrant { url: qdrant_url, collection: test_db.collection_name("descriptions"), vector_dim: 3 };
	let store = QdrantStore::new(&cfg).expect("Failed to build Qdrant client.");

	assert!(store.ensure_collection().await.expect("Failed to create collection."));
	assert!(!store.ensure_collection().await.expect("Failed to check collection."));
	assert_eq!(store.nearest(&[1.0, 0.0, 0.0]).await.expect("Query failed."), None);

	store
		.upsert(&RecordId::from("job-1"), &[0.6, 0.8, 0.0], "Backend Engineer at Acme")
		.await
		.expect("Upsert failed.");
	store.upsert(&RecordId::Num(2), &[0.0, 0.0, 1.0], "Designer at Globex").await.expect("Upsert failed.");

	let nearest =
		store.nearest(&[0.6, 0.8, 0.0]).await.expect("Query failed.").expect("Expected a point.");

	assert_eq!(nearest.id, RecordId::from("job-1"));
	assert_eq!(
		nearest.payload,
		Some(PointPayload { description: "Backend Engineer at Acme".to_string() })
	);

	let vector = nearest.vector.expect("Expected a vector.");

	assert!(vector.iter().zip([0.6_f32, 0.8, 0.0]).all(|(a, b)| (a - b).abs() < 1e-6));

	let numeric =
		store.nearest(&[0.0, 0.1, 1.0]).await.expect("Query failed.").expect("Expected a point.");

	assert_eq!(numeric.id, RecordId::Num(2));

	test_db.cleanup().await.expect("Failed to cleanup test resources.");
}
