use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use textgrid_parser::{
    parse_file, parse_str, parse_textgrid, Error, ParseOptions, Source, TextGridFormat, Tier,
    TierKind, Violation,
};

fn data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn strict(format: TextGridFormat) -> ParseOptions {
    ParseOptions::strict().with_format(format)
}

const SAMPLE: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"
xmin = 0
xmax = 1.5
tiers? <exists>
size = 1
item []:
    item [1]:
        class = "IntervalTier"
        name = "words"
        xmin = 0
        xmax = 1.5
        intervals: size = 1
        intervals [1]:
            xmin = 0
            xmax = 1.5
            text = "hello"
"#;

const THREE_INTERVALS: &str = r#"File type = "ooTextFile"
Object class = "TextGrid"
xmin = 0
xmax = 1.5
tiers? <exists>
size = 1
item []:
    item [1]:
        class = "IntervalTier"
        name = "words"
        xmin = 0
        xmax = 1.5
        intervals: size = 3
        intervals [1]:
            xmin = 0
            xmax = 0.2
            text = ""
        intervals [2]:
            xmin = 0.2
            xmax = 0.9
            text = "hello"
        intervals [3]:
            xmin = 0.9
            xmax = 1.5
            text = ""
"#;

#[test]
fn test_parse_full() {
    let tiers = parse_textgrid(
        Source::Path(&data("full.TextGrid")),
        &strict(TextGridFormat::Full),
    )
    .unwrap();

    assert_eq!(tiers.len(), 3);
    let kinds: Vec<TierKind> = tiers.iter().map(Tier::kind).collect();
    assert_eq!(
        kinds,
        vec![TierKind::Interval, TierKind::Interval, TierKind::Point]
    );
    let names: Vec<&str> = tiers.iter().map(Tier::name).collect();
    assert_eq!(names, vec!["sentence", "phonemes", "bell"]);
    assert_eq!(
        tiers.iter().map(Tier::len).collect::<Vec<_>>(),
        vec![1, 3, 2]
    );

    for tier in &tiers {
        assert!(tier.xmin() >= 0.0);
        assert!(tier.xmax() <= 2.3);
    }

    let sentence = tiers[0].as_interval_tier().unwrap();
    assert_eq!(sentence.intervals()[0].text(), "kdo \"ahoj\" řekl");

    let bell = tiers[2].as_point_tier().unwrap();
    assert_eq!(bell.points()[1].time(), 1.3);
    assert_eq!(bell.points()[1].text(), "dong");
}

#[test]
fn test_parse_full_simple() {
    let tiers = parse_textgrid(
        Source::Path(&data("full_simple.TextGrid")),
        &strict(TextGridFormat::Full),
    )
    .unwrap();

    let names: Vec<&str> = tiers.iter().map(Tier::name).collect();
    assert_eq!(names, vec!["Mary", "John", "bell"]);
    assert_eq!(
        tiers.iter().map(Tier::len).collect::<Vec<_>>(),
        vec![1, 1, 0]
    );
}

#[test]
fn test_short_and_full_fixtures_are_identical() {
    let full = parse_file(&data("full.TextGrid"), &strict(TextGridFormat::Full)).unwrap();
    let short = parse_file(&data("short.TextGrid"), &strict(TextGridFormat::Short)).unwrap();
    assert_eq!(full, short);
}

#[test]
fn test_minimal_alias_and_auto() {
    let minimal: TextGridFormat = "minimal".parse().unwrap();
    let short = parse_file(&data("short.TextGrid"), &strict(minimal)).unwrap();
    let auto_short = parse_file(&data("short.TextGrid"), &strict(TextGridFormat::Auto)).unwrap();
    let auto_full = parse_file(&data("full.TextGrid"), &strict(TextGridFormat::Auto)).unwrap();
    assert_eq!(short, auto_short);
    assert_eq!(auto_short, auto_full);
}

#[test]
fn test_sample_with_consistency_check() {
    let tiers = parse_textgrid(Source::Text(SAMPLE), &ParseOptions::strict()).unwrap();
    assert_eq!(tiers.len(), 1);

    let words = tiers[0].as_interval_tier().unwrap();
    assert_eq!(words.name(), "words");
    assert_eq!((words.xmin(), words.xmax()), (0.0, 1.5));
    assert_eq!(words.intervals().len(), 1);

    let interval = &words.intervals()[0];
    assert_eq!(
        (interval.xmin(), interval.xmax(), interval.text()),
        (0.0, 1.5, "hello")
    );
}

#[test]
fn test_gap_only_fails_when_checking() {
    let gapped = THREE_INTERVALS.replace(
        "            xmin = 0.9\n",
        "            xmin = 1.0\n",
    );

    let grid = parse_str(&gapped, &ParseOptions::default()).unwrap();
    assert_eq!(grid.tiers()[0].len(), 3);

    match parse_str(&gapped, &ParseOptions::strict()) {
        Err(Error::Consistency(err)) => {
            assert_eq!(err.tier_index, Some(0));
            assert_eq!(err.tier_name.as_deref(), Some("words"));
            assert_eq!(err.item_index, Some(2));
            assert_eq!(
                err.violation,
                Violation::Gap {
                    expected: 0.9,
                    found: 1.0
                }
            );
        }
        other => panic!("expected consistency error, got {:?}", other),
    }
}

#[test]
fn test_declared_count_too_high() {
    let text = THREE_INTERVALS.replace("intervals: size = 3", "intervals: size = 4");
    for options in [ParseOptions::default(), ParseOptions::strict()] {
        match parse_str(&text, &options) {
            Err(Error::Parse {
                found, expected, ..
            }) => {
                assert_eq!(found, "end of input");
                assert_eq!(expected, vec!["`intervals`".to_string()]);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}

#[test]
fn test_declared_count_too_low() {
    let text = THREE_INTERVALS.replace("intervals: size = 3", "intervals: size = 2");
    match parse_str(&text, &ParseOptions::default()) {
        Err(Error::Parse {
            position,
            found,
            expected,
        }) => {
            assert_eq!(position.line, 22);
            assert_eq!(found, "`intervals`");
            assert_eq!(expected, vec!["end of input".to_string()]);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_declared_point_count_mismatch() {
    let full = std::fs::read_to_string(data("full.TextGrid")).unwrap();

    let too_high = full.replace("points: size = 2", "points: size = 3");
    match parse_str(&too_high, &strict(TextGridFormat::Full)) {
        Err(Error::Parse {
            found, expected, ..
        }) => {
            assert_eq!(found, "end of input");
            assert_eq!(expected, vec!["`points`".to_string()]);
        }
        other => panic!("expected parse error, got {:?}", other),
    }

    let too_low = full.replace("points: size = 2", "points: size = 1");
    match parse_str(&too_low, &ParseOptions::default()) {
        Err(Error::Parse {
            position,
            found,
            expected,
        }) => {
            assert_eq!(position.line, 46);
            assert_eq!(found, "`points`");
            assert_eq!(expected, vec!["end of input".to_string()]);
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_inverted_grid_without_tiers() {
    let text = "File type = \"ooTextFile\"\nObject class = \"TextGrid\"\n\
        xmin = 5\nxmax = 1\ntiers? <exists>\nsize = 0\nitem []:\n";

    let grid = parse_str(text, &ParseOptions::default()).unwrap();
    assert_eq!((grid.xmin(), grid.xmax()), (5.0, 1.0));

    match parse_str(text, &ParseOptions::strict()) {
        Err(Error::Consistency(err)) => {
            assert_eq!(err.tier_index, None);
            assert_eq!(
                err.violation,
                Violation::Inverted {
                    xmin: 5.0,
                    xmax: 1.0
                }
            );
        }
        other => panic!("expected consistency error, got {:?}", other),
    }
}

#[test]
fn test_overflowing_time_is_rejected() {
    let short = std::fs::read_to_string(data("short.TextGrid")).unwrap();
    let text = short.replacen("2.3", "1e400", 1);
    assert!(matches!(
        parse_str(&text, &strict(TextGridFormat::Auto)),
        Err(Error::Lex { text, .. }) if text == "1e400"
    ));
}

#[test]
fn test_declared_tier_count_mismatch() {
    let text = SAMPLE.replace("size = 1\nitem", "size = 2\nitem");
    assert!(matches!(
        parse_str(&text, &ParseOptions::default()),
        Err(Error::Parse { .. })
    ));
}

#[test]
fn test_short_count_mismatch() {
    let short = std::fs::read_to_string(data("short.TextGrid")).unwrap();
    let text = short.replacen("<exists>\n3\n", "<exists>\n2\n", 1);
    let options = ParseOptions::default().with_format(TextGridFormat::Short);
    match parse_str(&text, &options) {
        Err(Error::Parse { found, .. }) => assert_eq!(found, "string \"TextTier\""),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_empty_tier_list() {
    let text = "File type = \"ooTextFile\"\nObject class = \"TextGrid\"\n\
        xmin = 0\nxmax = 0\ntiers? <exists>\nsize = 0\nitem []:\n";
    let tiers = parse_textgrid(Source::Text(text), &ParseOptions::strict()).unwrap();
    assert!(tiers.is_empty());
}

#[test]
fn test_wrong_object_class_before_tiers() {
    let text = SAMPLE.replace("\"TextGrid\"", "\"Pitch\"").replace("item [1]:", "item item");
    match parse_str(&text, &ParseOptions::default()) {
        Err(Error::Format { field, found }) => {
            assert_eq!(field, "object class");
            assert_eq!(found, "Pitch");
        }
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_wrong_file_type() {
    let text = SAMPLE.replace("\"ooTextFile\"", "\"ooBinaryFile\"");
    assert!(matches!(
        parse_str(&text, &ParseOptions::default()),
        Err(Error::Format {
            field: "file type",
            ..
        })
    ));
}

#[test]
fn test_lex_error_position() {
    let text = SAMPLE.replace("xmax = 1.5\ntiers?", "xmax = 1..5\ntiers?");
    match parse_str(&text, &ParseOptions::default()) {
        Err(Error::Lex { position, text }) => {
            assert_eq!((position.line, position.column), (4, 8));
            assert_eq!(text, "1..5");
        }
        other => panic!("expected lex error, got {:?}", other),
    }
}

#[test]
fn test_error_message_has_line_and_column() {
    let text = SAMPLE.replace("name = \"words\"", "name \"words\"");
    let err = parse_str(&text, &ParseOptions::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parse error at 10:14: found string \"words\", expected `=`"
    );
}

#[test]
fn test_parse_concurrently() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| parse_str(SAMPLE, &ParseOptions::strict()).unwrap()))
        .collect();
    let grids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(grids.windows(2).all(|w| w[0] == w[1]));
}
