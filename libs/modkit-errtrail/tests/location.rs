//! Every public constructor must report the line that called it.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use modkit_errtrail::{ChainLink, Classification, DataLayer, ErrorNode, Severity};

fn assert_called_here(err: &ErrorNode, line: u32) {
    let location = err.location().expect("location captured");
    assert_eq!(location.file(), Some(file!()));
    assert_eq!(location.line(), Some(line), "reported {location}");
}

#[test]
fn constructors_capture_call_site() {
    let (err, line) = (ErrorNode::base("boom"), line!());
    assert_called_here(&err, line);

    let line = line!() + 1;
    let err = ErrorNode::new(
        Classification::NotFound,
        DataLayer::UseCase,
        Severity::Info,
        None,
        "x",
    );
    assert_called_here(&err, line);

    let (err, line) = (ErrorNode::base_fmt(format_args!("{}", 1)), line!());
    assert_called_here(&err, line);

    let line = line!() + 1;
    let err = ErrorNode::new_fmt(
        Classification::NotFound,
        DataLayer::UseCase,
        Severity::Info,
        None,
        format_args!("{}", 1),
    );
    assert_called_here(&err, line);

    let (err, line) = (ErrorNode::wrap_fmt("io", format_args!("boom")), line!());
    assert_called_here(&err, line);
}

#[test]
fn classification_constructors_capture_call_site() {
    let (err, line) = (Classification::NotFound.base_error("boom"), line!());
    assert_called_here(&err, line);

    let (err, line) = (Classification::NotFound.wrap("io", "boom"), line!());
    assert_called_here(&err, line);

    let line = line!() + 1;
    let err = Classification::NotFound.wrap_fmt("io", format_args!("boom"));
    assert_called_here(&err, line);

    let line = line!() + 1;
    let err = Classification::NotFound.new_error(DataLayer::UseCase, Severity::Info, None, "x");
    assert_called_here(&err, line);

    let line = line!() + 1;
    let err = Classification::NotFound.new_error_fmt(
        DataLayer::UseCase,
        Severity::Info,
        None,
        format_args!("{}", 1),
    );
    assert_called_here(&err, line);

    let line = line!() + 1;
    let err = Classification::NotFound.base_error_fmt(format_args!("{}", 1));
    assert_called_here(&err, line);
}

#[test]
fn wrap_captures_wrap_site_not_cause_site() {
    let (inner, inner_line) = (ErrorNode::base("inner"), line!());
    let (outer, outer_line) = (ErrorNode::wrap(inner, "outer"), line!());

    assert_called_here(&outer, outer_line);
    let inner = outer.successor().and_then(ChainLink::as_node).unwrap();
    assert_called_here(inner, inner_line);
}

#[test]
fn add_operation_reports_its_caller() {
    let err = ErrorNode::base("root");
    let (annotated, line) = (err.add_operation("step", None, Severity::Info), line!());
    assert_called_here(&annotated, line);
}

#[test]
fn composed_message_starts_with_location() {
    let (err, line) = (ErrorNode::base("boom"), line!());
    assert_eq!(err.composed_message(), format!("{}:{line}, boom", file!()));
}
