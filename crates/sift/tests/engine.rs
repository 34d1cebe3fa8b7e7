//! End-to-end tests: filter, sort and paginate through the engine.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use sift::{
    Combinator, Dir, Engine, EngineConfig, FilterSet, Mode, Operand, PageRequest, Predicate,
    Seekable, SiftError, UnknownFieldPolicy,
};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Seekable)]
struct Address {
    city: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Seekable)]
struct Person {
    id: usize,
    #[serde(rename = "fullName")]
    name: String,
    age: u32,
    active: bool,
    joined: NaiveDateTime,
    shift_start: NaiveTime,
    nickname: Option<String>,
    #[seek(nested)]
    address: Option<Address>,
}

const FIRST: [&str; 7] = ["John", "Mary", "Johnny", "Ann", "Peter", "Joan", "Luke"];
const LAST: [&str; 5] = ["Smith", "Johnson", "Doe", "Stone", "Brown"];
const CITIES: [&str; 3] = ["Berlin", "Lisbon", "Oslo"];

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn people(n: usize) -> Vec<Person> {
    (0..n)
        .map(|i| Person {
            id: i,
            name: format!("{} {}", FIRST[i % FIRST.len()], LAST[(i / 3) % LAST.len()]),
            age: 18 + ((i * 37) % 60) as u32,
            active: i % 4 != 0,
            joined: at(2024, 1 + (i % 12) as u32, 1 + (i % 28) as u32, (i % 24) as u32, 0, 0),
            shift_start: NaiveTime::from_hms_opt(6 + (i % 8) as u32, 30, 0).unwrap(),
            nickname: (i % 5 == 0).then(|| format!("nick{i}")),
            address: (i % 3 != 0).then(|| Address {
                city: CITIES[(i / 2) % CITIES.len()].to_string(),
            }),
        })
        .collect()
}

fn ids(data: &[&Person]) -> Vec<usize> {
    data.iter().map(|p| p.id).collect()
}

fn all_of(query: &FilterSet, records: &[Person]) -> Vec<usize> {
    ids(Engine::default().run(records, query).unwrap().data())
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn thousand_records_are_deterministic() {
    let records = people(1_000);
    let query = FilterSet::all()
        .predicate("name", Mode::Contains, "john")
        .unwrap()
        .predicate("age", Mode::Gte, 25)
        .unwrap()
        .sort_by("age", Dir::Desc);

    let expected_total = records
        .iter()
        .filter(|p| p.name.to_lowercase().contains("john") && p.age >= 25)
        .count();
    let expected_first_age = records
        .iter()
        .filter(|p| p.name.to_lowercase().contains("john") && p.age >= 25)
        .map(|p| p.age)
        .max();

    let engine = Engine::default();
    let first = engine.run(&records, &query).unwrap();
    assert_eq!(first.total_size(), expected_total);
    assert_eq!(first.data().first().map(|p| p.age), expected_first_age);

    for _ in 0..5 {
        let again = engine.run(&records, &query).unwrap();
        assert_eq!(again.total_size(), first.total_size());
        assert_eq!(ids(again.data()), ids(first.data()));
    }
}

#[test]
fn ghost_field_is_ignored() {
    let records = people(200);
    let with_ghost = FilterSet::all()
        .predicate("ghost_field", Mode::Eq, "x")
        .unwrap()
        .predicate("age", Mode::Gte, 25)
        .unwrap();
    let without = FilterSet::all().predicate("age", Mode::Gte, 25).unwrap();

    assert_eq!(all_of(&with_ghost, &records), all_of(&without, &records));
}

#[test]
fn ghost_field_rejected_when_strict() {
    let records = people(10);
    let engine = Engine::new(EngineConfig::default().unknown_fields(UnknownFieldPolicy::Reject));
    let query = FilterSet::all().predicate("ghost_field", Mode::Eq, "x").unwrap();

    let err = engine.run(&records, &query).unwrap_err();
    assert!(matches!(err, SiftError::UnknownField { field } if field == "ghost_field"));
}

#[test]
fn age_range_from_wire_is_inclusive() {
    let records = people(300);
    let query = FilterSet::from_json(
        r#"{"filters": [{"field": "age", "value": {"from": 30, "to": 40}, "mode": "range", "dataType": "number"}]}"#,
    )
    .unwrap();

    let result = Engine::default().run(&records, &query).unwrap();
    let expected = records.iter().filter(|p| (30..=40).contains(&p.age)).count();
    assert_eq!(result.total_size(), expected);
    assert!(result.data().iter().all(|p| (30..=40).contains(&p.age)));
    assert!(result.data().iter().any(|p| p.age == 30));
    assert!(result.data().iter().any(|p| p.age == 40));
}

#[test]
fn date_only_literal_matches_whole_day() {
    let mut records = people(4);
    records[0].joined = at(2024, 3, 15, 0, 0, 0);
    records[1].joined = at(2024, 3, 15, 12, 30, 0);
    records[2].joined = at(2024, 3, 15, 23, 59, 59);
    records[3].joined = at(2024, 3, 16, 0, 0, 0);

    let query = FilterSet::from_json(
        r#"{"filters": [{"field": "joined", "value": "2024-03-15", "mode": "eq", "dataType": "date"}]}"#,
    )
    .unwrap();
    assert_eq!(all_of(&query, &records), vec![0, 1, 2]);

    let exact = FilterSet::from_json(
        r#"{"filters": [{"field": "joined", "value": "2024-03-15T12:30:00", "mode": "eq", "dataType": "date"}]}"#,
    )
    .unwrap();
    assert_eq!(all_of(&exact, &records), vec![1]);
}

#[test]
fn date_range_of_days_includes_last_day() {
    let mut records = people(3);
    records[0].joined = at(2024, 3, 1, 0, 0, 0);
    records[1].joined = at(2024, 3, 31, 23, 0, 0);
    records[2].joined = at(2024, 4, 1, 0, 0, 0);

    let query = FilterSet::from_json(
        r#"{"filters": [{"field": "joined", "value": ["2024-03-01", "2024-03-31"], "mode": "range", "dataType": "date"}]}"#,
    )
    .unwrap();
    assert_eq!(all_of(&query, &records), vec![0, 1]);
}

#[test]
fn inverted_date_range_is_malformed() {
    let err = FilterSet::from_json(
        r#"{"filters": [{"field": "joined", "value": {"from": "2024-04-01", "to": "2024-03-01"}, "mode": "range", "dataType": "date"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, SiftError::MalformedRange { .. }));
}

#[test]
fn time_of_day_ignores_date() {
    let records = people(16);
    let query = FilterSet::all()
        .filter(
            Predicate::typed(
                "shift_start",
                Mode::Before,
                sift::DataType::Time,
                Operand::from(NaiveTime::from_hms_opt(8, 0, 0).unwrap()),
            )
            .unwrap(),
        )
        .sort_asc("id");

    let expected: Vec<usize> = records
        .iter()
        .filter(|p| p.shift_start < NaiveTime::from_hms_opt(8, 0, 0).unwrap())
        .map(|p| p.id)
        .collect();
    assert_eq!(all_of(&query, &records), expected);
}

#[test]
fn page_beyond_end_is_empty() {
    let records = people(95);
    let query = FilterSet::new().page(PageRequest::new(10, 10).unwrap());

    let result = Engine::default().run(&records, &query).unwrap();
    assert!(result.data().is_empty());
    assert!(result.is_empty());
    assert_eq!(result.total_size(), 95);
    assert_eq!(result.total_page_count(), 10);
}

#[test]
fn pages_are_zero_based_and_cover_everything() {
    let records = people(95);
    let engine = Engine::default();
    let mut seen = Vec::new();

    for index in 0..10 {
        let query = FilterSet::new()
            .sort_asc("id")
            .page(PageRequest::new(index, 10).unwrap());
        let result = engine.run(&records, &query).unwrap();
        assert_eq!(result.page_index(), index);
        assert_eq!(result.total_page_count(), 10);
        seen.extend(ids(result.data()));
    }

    assert_eq!(seen, (0..95).collect::<Vec<_>>());
}

#[test]
fn page_count_arithmetic() {
    let engine = Engine::default();
    for (total, size, pages) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (95, 7, 14)] {
        let records = people(total);
        let query = FilterSet::new().page(PageRequest::new(0, size).unwrap());
        let result = engine.run(&records, &query).unwrap();
        assert_eq!(result.total_page_count(), pages, "total={total} size={size}");
    }
}

#[test]
fn empty_filter_set_returns_everything() {
    let records = people(50);
    let result = Engine::default().run(&records, &FilterSet::new()).unwrap();
    assert_eq!(result.total_size(), 50);
    assert_eq!(result.total_page_count(), 1);
}

#[test]
fn running_twice_is_idempotent() {
    let records = people(500);
    let query = FilterSet::any()
        .predicate("active", Mode::Eq, false)
        .unwrap()
        .predicate("address.city", Mode::Eq, "OSLO")
        .unwrap()
        .sort_desc("joined")
        .sort_asc("id")
        .page(PageRequest::new(1, 25).unwrap());

    let engine = Engine::default();
    let first = ids(engine.run(&records, &query).unwrap().data());
    let second = ids(engine.run(&records, &query).unwrap().data());
    assert_eq!(first, second);
    assert_eq!(first.len(), 25);
}

#[test]
fn refiltering_every_page_keeps_the_same_set() {
    let records = people(300);
    let query = FilterSet::all()
        .predicate("age", Mode::Gte, 40)
        .unwrap()
        .predicate("fullName", Mode::Contains, "jo")
        .unwrap()
        .sort_asc("id");

    let engine = Engine::default();
    let mut matched: Vec<Person> = Vec::new();
    let mut index = 0;
    loop {
        let page = query.clone().page(PageRequest::new(index, 16).unwrap());
        let result = engine.run(&records, &page).unwrap();
        matched.extend(result.data().iter().map(|p| (*p).clone()));
        index += 1;
        if index >= result.total_page_count() {
            break;
        }
    }

    let first: Vec<usize> = matched.iter().map(|p| p.id).collect();
    assert_eq!(first, all_of(&query, &records));
    assert_eq!(all_of(&query, &matched), first);
}

#[test]
fn and_versus_or() {
    let records = people(120);
    let young = Predicate::new("age", Mode::Lt, 30).unwrap();
    let inactive = Predicate::new("active", Mode::Eq, false).unwrap();

    let both = FilterSet::all().filter(young.clone()).filter(inactive.clone());
    let either = FilterSet::any().filter(young).filter(inactive);

    let expected_both = records.iter().filter(|p| p.age < 30 && !p.active).count();
    let expected_either = records.iter().filter(|p| p.age < 30 || !p.active).count();

    let engine = Engine::default();
    assert_eq!(engine.run(&records, &both).unwrap().total_size(), expected_both);
    assert_eq!(engine.run(&records, &either).unwrap().total_size(), expected_either);
    assert_eq!(either.combinator(), Combinator::Or);
}

#[test]
fn nested_and_optional_fields() {
    let records = people(30);

    let in_berlin = FilterSet::all()
        .predicate("address.city", Mode::Eq, "berlin")
        .unwrap()
        .sort_asc("id");
    let expected: Vec<usize> = records
        .iter()
        .filter(|p| p.address.as_ref().is_some_and(|a| a.city == "Berlin"))
        .map(|p| p.id)
        .collect();
    assert_eq!(all_of(&in_berlin, &records), expected);

    let no_city = FilterSet::all()
        .predicate("address.city", Mode::IsEmpty, Operand::Absent)
        .unwrap();
    let homeless = records.iter().filter(|p| p.address.is_none()).count();
    assert_eq!(
        Engine::default().run(&records, &no_city).unwrap().total_size(),
        homeless
    );

    let with_nickname = FilterSet::all()
        .predicate("nickname", Mode::IsNotEmpty, Operand::Absent)
        .unwrap();
    let nicknamed = records.iter().filter(|p| p.nickname.is_some()).count();
    assert_eq!(
        Engine::default().run(&records, &with_nickname).unwrap().total_size(),
        nicknamed
    );
}

#[test]
fn serde_rename_is_a_query_name() {
    let records = people(14);
    let by_field = FilterSet::all().predicate("name", Mode::StartsWith, "mary").unwrap();
    let by_alias = FilterSet::all().predicate("fullName", Mode::StartsWith, "mary").unwrap();
    assert_eq!(all_of(&by_field, &records), all_of(&by_alias, &records));
    assert_eq!(all_of(&by_field, &records).len(), 2);
}

#[test]
fn unsupported_mode_fails_at_construction() {
    let err = FilterSet::from_json(
        r#"{"filters": [{"field": "active", "value": true, "mode": "contains", "dataType": "bool"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, SiftError::UnsupportedMode { .. }));
}

#[test]
fn type_mismatch_fails_the_run() {
    let records = people(64);
    let query = FilterSet::all().predicate("name", Mode::Gt, 5).unwrap();

    for workers in [1, 4] {
        let engine = Engine::new(EngineConfig::default().parallelism(workers));
        let err = engine.run(&records, &query).unwrap_err();
        assert!(
            matches!(&err, SiftError::TypeMismatch { field, .. } if field == "name"),
            "{err}"
        );
    }
}

#[test]
fn sort_keys_break_ties_in_order() {
    let records = people(60);
    let query = FilterSet::new().sort_asc("age").sort_desc("id");
    let result = Engine::default().run(&records, &query).unwrap();

    let keys: Vec<(u32, usize)> = result.data().iter().map(|p| (p.age, p.id)).collect();
    let mut expected = keys.clone();
    expected.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));
    assert_eq!(keys, expected);
}

#[test]
fn missing_values_sort_last_in_both_directions() {
    let records = people(90);

    for dir in [Dir::Asc, Dir::Desc] {
        let query = FilterSet::new().sort_by("nickname", dir);
        let result = Engine::default().run(&records, &query).unwrap();
        let nicknames: Vec<Option<&str>> =
            result.data().iter().map(|p| p.nickname.as_deref()).collect();

        let present = nicknames.iter().take_while(|n| n.is_some()).count();
        assert_eq!(present, records.iter().filter(|p| p.nickname.is_some()).count());
        assert!(nicknames[present..].iter().all(Option::is_none));

        let mut expected: Vec<Option<&str>> = nicknames[..present].to_vec();
        expected.sort();
        if dir.is_desc() {
            expected.reverse();
        }
        assert_eq!(&nicknames[..present], expected.as_slice());
    }
}

#[test]
fn result_serializes_for_the_wire() {
    let records = people(3);
    let query = FilterSet::new()
        .sort_asc("id")
        .page(PageRequest::new(0, 1).unwrap());
    let result = Engine::default().run(&records, &query).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["totalSize"], 3);
    assert_eq!(json["totalPageCount"], 3);
    assert_eq!(json["pageIndex"], 0);
    assert_eq!(json["pageSize"], 1);
    assert_eq!(json["data"][0]["fullName"], "John Smith");
}
