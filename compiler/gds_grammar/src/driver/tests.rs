use gds_ir::Kind;
use pretty_assertions::assert_eq;

use super::*;

const HEADER: Kind = Kind::new(0x00);
const BGNLIB: Kind = Kind::new(0x01);
const LIBNAME: Kind = Kind::new(0x02);
const UNITS: Kind = Kind::new(0x03);
const ENDLIB: Kind = Kind::new(0x04);
const BGNSTR: Kind = Kind::new(0x05);
const STRNAME: Kind = Kind::new(0x06);
const ENDSTR: Kind = Kind::new(0x07);
const BOUNDARY: Kind = Kind::new(0x08);
const SREF: Kind = Kind::new(0x0A);
const LAYER: Kind = Kind::new(0x0D);
const DATATYPE: Kind = Kind::new(0x0E);
const XY: Kind = Kind::new(0x10);
const ENDEL: Kind = Kind::new(0x11);
const SNAME: Kind = Kind::new(0x12);

/// A record: its kind and a short name standing in for decoded data.
type Record = (Kind, &'static str);

fn records(stream: &[Record]) -> Vec<Token<Record>> {
    stream
        .iter()
        .map(|&record| Token::new(record.0, record))
        .collect()
}

fn element() -> RuleDef {
    RuleDef::choice([
        RuleDef::sequence([
            RuleDef::leaf(BOUNDARY),
            RuleDef::leaf(LAYER),
            RuleDef::leaf(DATATYPE),
            RuleDef::leaf(XY),
            RuleDef::leaf(ENDEL),
        ])
        .labeled("boundary"),
        RuleDef::sequence([
            RuleDef::leaf(SREF),
            RuleDef::leaf(SNAME),
            RuleDef::leaf(XY),
            RuleDef::leaf(ENDEL),
        ])
        .labeled("sref"),
    ])
    .labeled("element")
}

fn library() -> RuleDef {
    RuleDef::sequence([
        RuleDef::leaf(HEADER),
        RuleDef::leaf(BGNLIB),
        RuleDef::leaf(LIBNAME),
        RuleDef::optional([RuleDef::leaf(UNITS)]),
        RuleDef::zero_or_more([
            RuleDef::leaf(BGNSTR),
            RuleDef::leaf(STRNAME),
            RuleDef::zero_or_more([element()]),
            RuleDef::leaf(ENDSTR),
        ]),
        RuleDef::leaf(ENDLIB),
    ])
    .labeled("library")
}

fn driver(def: &RuleDef, config: DriverConfig) -> Driver<Record> {
    Driver::from_def(def, config).unwrap()
}

const LIBRARY: &[Record] = &[
    (HEADER, "v600"),
    (BGNLIB, "dates"),
    (LIBNAME, "lib"),
    (BGNSTR, "dates"),
    (STRNAME, "top"),
    (BOUNDARY, "b"),
    (LAYER, "1"),
    (DATATYPE, "0"),
    (XY, "square"),
    (ENDEL, "e"),
    (SREF, "s"),
    (SNAME, "cell"),
    (XY, "origin"),
    (ENDEL, "e"),
    (ENDSTR, "top"),
    (ENDLIB, "lib"),
];

#[test]
fn config_defaults_and_builders() {
    let config = DriverConfig::default();
    assert!(config.collecting);
    assert!(!config.repeat_root);
    assert!(!config.allow_trailing);

    let config = DriverConfig::default()
        .with_collecting(false)
        .with_repeat_root(true)
        .with_allow_trailing(true);
    assert_eq!(
        config,
        DriverConfig {
            collecting: false,
            repeat_root: true,
            allow_trailing: true,
        }
    );
}

#[test]
fn accepts_well_formed_library() {
    let mut driver = driver(&library(), DriverConfig::default().with_collecting(false));
    let parsed = driver.run(records(LIBRARY)).unwrap();

    assert_eq!(parsed.matches.len(), 1);
    assert_eq!(parsed.matched_len(), LIBRARY.len());
    assert_eq!(parsed.matches[0].tokens, records(LIBRARY));
    assert!(parsed.matches[0].collected.is_empty());
    assert!(parsed.trailing.is_empty());
}

#[test]
fn collects_library_structure() {
    let mut driver = driver(&library(), DriverConfig::default());
    let parsed = driver.run(records(LIBRARY)).unwrap();

    let item = |index: usize| Collected::Item(LIBRARY[index]);
    let boundary = Collected::Group((5..10).map(item).collect());
    let sref = Collected::Group((10..14).map(item).collect());
    let structure = Collected::Group(vec![
        item(3),
        item(4),
        // zero_or_more over one choice: one group per pass, each holding
        // the choice's group, which holds the winning sequence's group.
        Collected::Group(vec![
            Collected::Group(vec![Collected::Group(vec![boundary])]),
            Collected::Group(vec![Collected::Group(vec![sref])]),
        ]),
        item(14),
    ]);
    assert_eq!(
        parsed.matches[0].collected,
        vec![
            item(0),
            item(1),
            item(2),
            Collected::Group(Vec::new()),
            Collected::Group(vec![structure]),
            item(15),
        ]
    );
    let names: Vec<_> = parsed.matches[0]
        .collected
        .iter()
        .flat_map(Collected::items)
        .map(|record| record.1)
        .collect();
    assert_eq!(names, LIBRARY.iter().map(|record| record.1).collect::<Vec<_>>());
}

#[test]
fn reports_token_that_broke_the_match() {
    let mut stream = LIBRARY.to_vec();
    // Boundary without its datatype record: XY arrives where DATATYPE
    // belongs, and no ancestor can recover.
    stream.remove(7);

    let err = driver(&library(), DriverConfig::default())
        .run(records(&stream))
        .unwrap_err();
    assert_eq!(
        err,
        DriveError::Mismatch {
            position: 7,
            kind: XY,
            attempt_start: 0,
            rule: Some("library".to_owned()),
        }
    );
}

#[test]
fn repeat_root_splits_element_stream() {
    let stream = [
        (BOUNDARY, "b"),
        (LAYER, "1"),
        (DATATYPE, "0"),
        (XY, "square"),
        (ENDEL, "e"),
        (SREF, "s"),
        (SNAME, "cell"),
        (XY, "origin"),
        (ENDEL, "e"),
    ];
    let config = DriverConfig::default()
        .with_repeat_root(true)
        .with_collecting(false);
    let parsed = driver(&element(), config).run(records(&stream)).unwrap();

    assert_eq!(parsed.matches.len(), 2);
    assert_eq!(parsed.matches[0].tokens, records(&stream[..5]));
    assert_eq!(parsed.matches[1].tokens, records(&stream[5..]));
}

#[test]
fn mismatch_in_later_match_reports_its_attempt() {
    let stream = [
        (SREF, "s"),
        (SNAME, "cell"),
        (XY, "origin"),
        (ENDEL, "e"),
        (SREF, "s"),
        (XY, "origin"),
    ];
    let config = DriverConfig::default().with_repeat_root(true);
    let err = driver(&element(), config).run(records(&stream)).unwrap_err();
    assert_eq!(
        err,
        DriveError::Mismatch {
            position: 5,
            kind: XY,
            attempt_start: 4,
            rule: Some("element".to_owned()),
        }
    );
}

#[test]
fn trailing_tokens_are_rejected_unless_allowed() {
    let mut stream = LIBRARY.to_vec();
    stream.push((HEADER, "again"));

    let err = driver(&library(), DriverConfig::default())
        .run(records(&stream))
        .unwrap_err();
    assert_eq!(
        err,
        DriveError::TrailingTokens {
            position: LIBRARY.len(),
            kind: HEADER,
        }
    );

    let config = DriverConfig::default().with_allow_trailing(true);
    let parsed = driver(&library(), config).run(records(&stream)).unwrap();
    assert_eq!(parsed.trailing, records(&[(HEADER, "again")]));
}

#[test]
fn replayed_tokens_become_trailing() {
    // ZeroOrMore only finishes on the first record it cannot use, which
    // the driver hands back as trailing input.
    let def = RuleDef::zero_or_more([RuleDef::leaf(XY)]);
    let config = DriverConfig::default().with_allow_trailing(true);
    let parsed = driver(&def, config)
        .run(records(&[(XY, "a"), (XY, "b"), (ENDEL, "e"), (ENDLIB, "z")]))
        .unwrap();

    assert_eq!(parsed.matched_len(), 2);
    assert_eq!(parsed.trailing, records(&[(ENDEL, "e"), (ENDLIB, "z")]));
}

#[test]
fn input_ending_mid_match_is_an_error() {
    let err = driver(&library(), DriverConfig::default())
        .run(records(&LIBRARY[..6]))
        .unwrap_err();
    assert_eq!(err, DriveError::UnexpectedEnd { consumed: 6 });
}

#[test]
fn empty_input_is_an_error() {
    let err = driver(&library(), DriverConfig::default())
        .run(Vec::new())
        .unwrap_err();
    assert_eq!(err, DriveError::EmptyInput);
}

#[test]
fn driver_is_reusable_after_failure() {
    let mut driver = driver(&library(), DriverConfig::default());
    assert!(driver.run(records(&LIBRARY[..6])).is_err());
    assert!(driver.run(records(&[(ENDLIB, "lib")])).is_err());
    let parsed = driver.run(records(LIBRARY)).unwrap();
    assert_eq!(parsed.matched_len(), LIBRARY.len());
    assert_eq!(driver.root().label(), Some("library"));
    assert!(driver.config().collecting);
}

#[test]
fn invalid_definition_is_rejected_before_running() {
    let err = Driver::<Record>::from_def(&RuleDef::choice([]), DriverConfig::default()).unwrap_err();
    assert_eq!(
        err,
        GrammarError::EmptyComposite {
            shape: crate::RuleShape::Choice,
            label: None,
        }
    );
}
