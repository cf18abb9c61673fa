use stroyhelper::calc::{Deduction, DeductionKind, LengthUnit, Plan, RoomReport, RoomShape};
use stroyhelper::db::{connect_db, open_in_memory, CalculationId, Database, UserKey};

fn room_with_window() -> RoomReport {
    let plan = Plan::rectangle(5.0, 4.0).unwrap();
    let mut report = RoomReport::new(RoomShape::Rectangular, LengthUnit::Millimeter, plan, Some(2.7)).unwrap();
    report
        .deductions
        .push(Deduction::new(DeductionKind::Window, 1.4, 1.5).unwrap());
    report
}

#[tokio::test]
async fn history_is_scoped_per_user() {
    let db = open_in_memory().await.unwrap();
    let alice = UserKey(1);
    let bob = UserKey(2);

    let id = db.save_calculation(alice, &room_with_window()).await.unwrap();
    assert!(db.get_calculation(bob, id).await.unwrap().is_none());
    assert!(!db.delete_calculation(bob, id).await.unwrap());

    let saved = db.get_calculation(alice, id).await.unwrap().unwrap();
    assert_eq!(saved.report, room_with_window());
    assert_eq!(saved.report.net_wall_area(), Some(46.5));

    assert!(db.list_calculations(bob, 10).await.unwrap().is_empty());
    assert_eq!(db.list_calculations(alice, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_a_calculation_removes_its_deductions() {
    let db = open_in_memory().await.unwrap();
    let user = UserKey(5);
    let id = db.save_calculation(user, &room_with_window()).await.unwrap();

    assert!(db.delete_calculation(user, id).await.unwrap());
    let orphans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM deductions WHERE calculation_id = ?")
        .bind(id.0)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(orphans, 0);
    assert!(db.get_calculation(user, CalculationId(id.0)).await.unwrap().is_none());
}

#[tokio::test]
async fn schema_creation_is_idempotent() {
    let db = Database::new(connect_db("sqlite::memory:", 1).await.unwrap());
    db.init_schema().await.unwrap();
    db.init_schema().await.unwrap();
    let note = db.add_note(UserKey(1), "Замерить окна").await.unwrap();
    let notes = db.list_notes(UserKey(1), 10).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, note);
    assert!(db.delete_note(UserKey(1), note).await.unwrap());
    assert!(!db.delete_note(UserKey(1), note).await.unwrap());
}
