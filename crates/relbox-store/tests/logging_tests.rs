#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{memory_db, Course};
use relbox_core::core_types::schema::EVENT_END_ERROR;
use relbox_core::logging_facility::test_capture::init_test_capture;

#[test]
fn test_units_of_work_log_start_and_end() {
    let capture = init_test_capture();
    let db = memory_db();
    let repo = db.repository::<Course>().unwrap();

    let mut course = Course::named("Math");
    repo.save(&mut course).unwrap();
    repo.find_all().execute().unwrap().all().unwrap();
    repo.remove(&mut course).unwrap();
    repo.clear().unwrap();

    for op in ["save", "query", "remove", "clear"] {
        assert!(capture.unit_completed(op, "Course"), "{op} not bracketed");
    }
}

#[test]
fn test_failed_remove_logs_error_code() {
    let capture = init_test_capture();
    let db = memory_db();
    let repo = db.repository::<Course>().unwrap();

    let mut course = Course::named("Never saved");
    assert!(repo.remove(&mut course).is_err());

    let errors: Vec<_> = capture
        .events_for("remove", "Course")
        .into_iter()
        .filter(|e| e.is("remove", EVENT_END_ERROR))
        .collect();
    assert!(errors
        .iter()
        .any(|e| e.err_code() == Some("ERR_NOT_PERSISTED")));
}
