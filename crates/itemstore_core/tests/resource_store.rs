use itemstore_core::db::open_db_in_memory;
use itemstore_core::{
    DatabaseTarget, HealthReport, ItemPatch, ItemRepository, NewItem, NewTask, RepoError,
    ResourceStore, StoreError,
};

fn stores() -> Vec<ResourceStore> {
    vec![
        ResourceStore::open(&DatabaseTarget::SqliteMemory).unwrap(),
        ResourceStore::open(&DatabaseTarget::Memory).unwrap(),
    ]
}

#[test]
fn both_backends_follow_the_same_item_contract() {
    for store in stores() {
        let backend = store.backend_name();

        let created = store.create_item(NewItem::new("Widget")).unwrap();
        assert_eq!(created.id, 1, "{backend}");
        assert_eq!(store.get_item(created.id).unwrap(), created, "{backend}");

        let conflict = store.create_item(NewItem::new("Widget")).unwrap_err();
        assert!(matches!(conflict, StoreError::Conflict { .. }), "{backend}");

        let updated = store
            .update_item(created.id, ItemPatch::description("new"))
            .unwrap();
        assert_eq!(updated.name, "Widget", "{backend}");
        assert_eq!(updated.description.as_deref(), Some("new"), "{backend}");

        store.delete_item(created.id).unwrap();
        assert!(
            matches!(store.get_item(created.id), Err(StoreError::NotFound { .. })),
            "{backend}"
        );
        assert!(
            matches!(
                store.delete_item(created.id),
                Err(StoreError::NotFound { .. })
            ),
            "{backend}"
        );

        let next = store.create_item(NewItem::new("Gadget")).unwrap();
        assert_eq!(next.id, 2, "{backend}: ids must not be reused");
    }
}

#[test]
fn both_backends_list_tasks_newest_first() {
    for store in stores() {
        let first = store.create_task(NewTask::new("first")).unwrap();
        let second = store.create_task(NewTask::new("second")).unwrap();

        let ids: Vec<_> = store
            .list_tasks()
            .unwrap()
            .into_iter()
            .map(|task| task.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id], "{}", store.backend_name());

        let completed = store.complete_task(first.id).unwrap();
        assert!(completed.completed);
    }
}

#[test]
fn failed_unit_of_work_is_rolled_back() {
    for store in stores() {
        let result: Result<(), StoreError> = store.with_items(|items| {
            items.create_item(NewItem::new("half-written"))?;
            Err(StoreError::Storage(RepoError::InvalidData(
                "simulated failure after insert".to_string(),
            )))
        });
        assert!(matches!(result, Err(StoreError::Storage(_))));

        assert!(
            store.list_items().unwrap().is_empty(),
            "{}: no partial record may persist",
            store.backend_name()
        );
        // The discarded insert keeps its name free.
        store.create_item(NewItem::new("half-written")).unwrap();
    }
}

#[test]
fn health_probe_reports_healthy_for_reachable_store() {
    for store in stores() {
        assert_eq!(store.probe(), HealthReport::Healthy);
    }
}

#[test]
fn health_probe_reports_error_text_when_store_is_broken() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE items;").unwrap();
    let store = ResourceStore::from_connection(conn);

    match store.probe() {
        HealthReport::Unhealthy { error } => assert!(error.contains("items"), "{error}"),
        HealthReport::Healthy => panic!("probe must fail without the items table"),
    }
}

#[test]
fn health_probe_does_not_mutate_state() {
    let store = ResourceStore::open(&DatabaseTarget::SqliteMemory).unwrap();
    store.create_item(NewItem::new("Widget")).unwrap();

    assert!(store.probe().is_healthy());
    assert_eq!(store.list_items().unwrap().len(), 1);
}

#[test]
fn with_items_exposes_repository_backed_service() {
    let store = ResourceStore::in_memory();
    let count = store
        .with_items(|items| {
            items.create_item(NewItem::new("a"))?;
            items.create_item(NewItem::new("b"))?;
            Ok(items.list_items()?.len())
        })
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn sqlite_file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let target = DatabaseTarget::SqliteFile(dir.path().join("items.db"));

    let created = {
        let store = ResourceStore::open(&target).unwrap();
        store.create_item(NewItem::new("Widget")).unwrap()
    };

    let reopened = ResourceStore::open(&target).unwrap();
    assert_eq!(reopened.get_item(created.id).unwrap(), created);
}

#[test]
fn services_accept_repository_trait_objects() {
    let conn = open_db_in_memory().unwrap();
    let repo = itemstore_core::SqliteItemRepository::new(&conn);
    let dyn_repo: &dyn ItemRepository = &repo;
    let service = itemstore_core::ItemService::new(dyn_repo);

    let item = service.create_item(NewItem::new("Widget")).unwrap();
    assert_eq!(dyn_repo.find_item_by_name("Widget").unwrap(), Some(item));
}
