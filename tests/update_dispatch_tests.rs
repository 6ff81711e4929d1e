use std::cell::RefCell;
use std::rc::Rc;

use replot_rs::core::{CategoricalScale, DomainValue, GenomeScale, Scale};
use replot_rs::data::{DataContainer, RowsInput};

fn sample_scale() -> CategoricalScale {
    CategoricalScale::new(
        "sample_id",
        "Sample",
        ["S1", "S2", "S3"]
            .into_iter()
            .map(DomainValue::text)
            .collect::<Vec<_>>(),
    )
}

fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &str) -> impl FnMut() + 'static {
    let log = Rc::clone(log);
    let tag = tag.to_owned();
    move || log.borrow_mut().push(tag.clone())
}

#[test]
fn updates_fan_out_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scale = sample_scale();
    scale.on_update("track", recorder(&log, "track"));
    scale.on_update("legend", recorder(&log, "legend"));
    scale.on_update("table", recorder(&log, "table"));

    scale.zoom(0, 1);
    assert_eq!(*log.borrow(), ["track", "legend", "table"]);
}

#[test]
fn re_registering_a_subscriber_keeps_its_slot() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scale = sample_scale();
    scale.on_update("track", recorder(&log, "track"));
    scale.on_update("legend", recorder(&log, "stale legend"));
    scale.on_update("table", recorder(&log, "table"));
    scale.on_update("legend", recorder(&log, "fresh legend"));

    scale.zoom(0, 1);
    assert_eq!(*log.borrow(), ["track", "fresh legend", "table"]);
}

#[test]
fn unsubscribing_detaches_every_topic() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scale = sample_scale();
    scale.on_update("legend", recorder(&log, "update"));
    scale.on_highlight("legend", {
        let log = Rc::clone(&log);
        move |value| log.borrow_mut().push(format!("highlight {value}"))
    });
    scale.on_highlight_destroy("legend", recorder(&log, "destroy"));

    scale.emit_highlight(&DomainValue::text("S2"));
    scale.unsubscribe("legend");
    scale.zoom(0, 1);
    scale.emit_highlight(&DomainValue::text("S3"));
    scale.emit_highlight_destroy();

    assert_eq!(*log.borrow(), ["highlight S2"]);
}

#[test]
fn each_mutation_notifies_exactly_once() {
    let count = Rc::new(RefCell::new(0));
    let mut scale = sample_scale();
    scale.on_update("counter", {
        let count = Rc::clone(&count);
        move || *count.borrow_mut() += 1
    });

    scale.zoom(0, 2);
    assert_eq!(*count.borrow(), 1);

    scale.reset_sort();
    assert_eq!(*count.borrow(), 2);

    scale.reset_filter();
    assert_eq!(*count.borrow(), 3);
}

#[test]
fn genome_filters_notify_subscribers() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scale = GenomeScale::new("genome_coordinate", "Genome coordinate");
    scale.on_update("track", recorder(&log, "update"));

    scale.filter_by_chromosome("5").expect("known chromosome");
    scale.reset();
    assert_eq!(*log.borrow(), ["update", "update"]);
}

#[test]
fn containers_notify_once_their_rows_arrive() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut container = DataContainer::new("exposures", "Exposures", RowsInput::Pending);
    container.on_update("table", recorder(&log, "rows"));
    assert!(container.is_loading());

    container.resolve_rows(Vec::new());
    assert!(!container.is_loading());
    assert_eq!(*log.borrow(), ["rows"]);

    container.resolve_rows(Vec::new());
    assert_eq!(*log.borrow(), ["rows"]);
}
