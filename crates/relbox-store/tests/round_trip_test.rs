#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use chrono::{TimeZone, Utc};
use common::{memory_db, saved_courses, Clazz, Sample, Student};

#[test]
fn test_every_storage_kind_reads_back() {
    let db = memory_db();
    let repo = db.repository::<Sample>().unwrap();

    let mut sample = Sample {
        id: 0,
        flag: true,
        tiny: -7,
        small: 1200,
        medium: -70_000,
        large: 9_000_000_000,
        ratio: 0.5,
        precise: 3.25,
        label: Some("hello".to_string()),
        taken_at: Some(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()),
        payload: vec![0, 1, 254, 255],
    };
    repo.save(&mut sample).unwrap();

    let loaded = repo.find_all().execute().unwrap().first().unwrap().unwrap();
    assert_eq!(loaded, sample);
}

#[test]
fn test_absent_optional_columns_read_back_as_none() {
    let db = memory_db();
    let repo = db.repository::<Sample>().unwrap();

    let mut sample = Sample {
        payload: vec![1],
        ..Sample::default()
    };
    repo.save(&mut sample).unwrap();

    let loaded = repo.find_all().execute().unwrap().first().unwrap().unwrap();
    assert_eq!(loaded.label, None);
    assert_eq!(loaded.taken_at, None);
    assert!(!loaded.flag);
}

#[test]
fn test_student_graph_reads_back() {
    let db = memory_db();
    let courses = saved_courses(&db, &["Math", "Physics", "Art", "Music"]);
    let mut clazz = Clazz::named("Class 4");
    db.repository::<Clazz>().unwrap().save(&mut clazz).unwrap();

    let mut student = Student::named("Richard", 19);
    student.clazz = Some(clazz);
    student.course_list = vec![courses[3].clone(), courses[0].clone(), courses[2].clone()];
    student.favorite_courses = Some(vec![courses[1].clone(), courses[3].clone()]);
    student.nickname = "Rick".to_string();

    let repo = db.repository::<Student>().unwrap();
    repo.save(&mut student).unwrap();

    let loaded = repo.find_all().execute().unwrap().first().unwrap().unwrap();
    assert_eq!(loaded.nickname, "");
    let expected = Student {
        nickname: String::new(),
        ..student
    };
    assert_eq!(loaded, expected);
}
