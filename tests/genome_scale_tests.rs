use approx::assert_relative_eq;
use replot_rs::api::{InteractionEngine, PlotState};
use replot_rs::core::GenomeScale;
use replot_rs::history::{ActionName, EventParam, EventSubtype, EventType, HistoryEvent};

const HG19_TOTAL: f64 = 3_095_693_983.0;

fn genome_state() -> PlotState {
    let mut state = PlotState::new();
    state.add_scale(GenomeScale::new("genome_coordinate", "Genome coordinate"));
    state
}

fn genome(engine: &InteractionEngine) -> &GenomeScale {
    engine
        .state()
        .get_scale("genome_coordinate")
        .and_then(|scale| scale.as_genome())
        .expect("genome scale")
}

#[test]
fn early_chromosome_positions_map_near_zero() {
    let scale = GenomeScale::new("genome_coordinate", "Genome coordinate");
    let ratio = scale.convert_position_to_ratio("1", 2000).expect("ratio");
    assert_relative_eq!(ratio, 2000.0 / HG19_TOTAL, max_relative = 1e-12);
    assert_relative_eq!(ratio, 6.460_586_902_268_111e-7, max_relative = 1e-12);
}

#[test]
fn positions_accumulate_the_preceding_chromosome_spans() {
    let scale = GenomeScale::new("genome_coordinate", "Genome coordinate");
    let ratio = scale.convert_position_to_ratio("5", 3000).expect("ratio");
    assert_relative_eq!(ratio, 881_629_700.0 / HG19_TOTAL, max_relative = 1e-12);
    assert_relative_eq!(ratio, 0.284_792_264_623_528_2, max_relative = 1e-12);
}

#[test]
fn filtering_rescales_ratios_to_the_kept_chromosomes() {
    let mut scale = GenomeScale::new("genome_coordinate", "Genome coordinate");
    scale.filter_by_chromosome("5").expect("known chromosome");

    assert_eq!(scale.chromosomes_filtered(), ["5"]);
    assert_eq!(scale.chromosomes().len(), 25);
    assert_eq!(scale.chromosome_ratios_filtered(), [1.0]);
    assert_eq!(scale.chromosome_ratios_cumulative_filtered(), [0.0]);

    let filtered = scale
        .convert_position_to_ratio_filtered("5", 3000)
        .expect("ratio");
    assert_relative_eq!(filtered, 3000.0 / 180_915_260.0, max_relative = 1e-12);

    let unfiltered = scale.convert_position_to_ratio("5", 3000).expect("ratio");
    assert_relative_eq!(unfiltered, 0.284_792_264_623_528_2, max_relative = 1e-12);

    scale.reset();
    assert_eq!(
        scale.chromosome_ratios_cumulative_filtered(),
        scale.chromosome_ratios_cumulative(),
    );
}

#[test]
fn position_windows_narrow_a_single_chromosome() {
    let mut scale = GenomeScale::new("genome_coordinate", "Genome coordinate");
    scale
        .filter_by_chromosome_and_position("17", 7_571_720, 7_590_868)
        .expect("known chromosome");

    assert_eq!(scale.chromosomes_filtered(), ["17"]);
    assert_eq!(scale.domain_filtered("17"), Some((7_571_720, 7_590_868)));
    assert_eq!(scale.domain("17"), Some((0, 81_195_210)));

    // Window span is 19,148 bases; ratios divide by it alone.
    assert_eq!(scale.chromosome_ratios_filtered(), [1.0]);
    let mid = scale
        .convert_position_to_ratio_filtered("17", 7_571_720 + 9_574)
        .expect("ratio");
    assert_relative_eq!(mid, 0.5, max_relative = 1e-12);

    scale.reset();
    assert_eq!(scale.chromosomes_filtered().len(), 25);
    assert_eq!(scale.domain_filtered("17"), Some((0, 81_195_210)));
}

#[test]
fn inverted_position_windows_are_rejected() {
    let mut scale = GenomeScale::new("genome_coordinate", "Genome coordinate");
    assert!(
        scale
            .filter_by_chromosome_and_position("17", 5_000, 1_000)
            .is_err()
    );

    // The rejected window leaves the filtered state untouched.
    assert_eq!(scale.chromosomes_filtered().len(), 25);
    let filtered = scale
        .convert_position_to_ratio_filtered("17", 2_000)
        .expect("ratio");
    let unfiltered = scale.convert_position_to_ratio("17", 2_000).expect("ratio");
    assert_relative_eq!(filtered, unfiltered);
}

#[test]
fn inverted_position_windows_do_not_enter_the_history() {
    let mut engine = InteractionEngine::new(genome_state());
    let event = HistoryEvent::new(
        EventType::Scale,
        EventSubtype::Filter,
        "genome_coordinate",
        ActionName::FilterByChromosomeAndPosition,
        vec![
            EventParam::literal("17"),
            EventParam::literal(5_000),
            EventParam::literal(1_000),
        ],
    );
    assert!(engine.dispatch(event).is_err());
    assert!(!engine.can_go_back());
    assert_eq!(genome(&engine).chromosomes_filtered().len(), 25);
}

#[test]
fn genome_filters_replay_through_the_history() {
    let mut engine = InteractionEngine::new(genome_state());
    let event = HistoryEvent::new(
        EventType::Scale,
        EventSubtype::Filter,
        "genome_coordinate",
        ActionName::FilterByChromosome,
        vec![EventParam::literal("5")],
    );
    engine.dispatch(event).expect("dispatch");
    assert_eq!(genome(&engine).chromosomes_filtered(), ["5"]);

    engine.go_back();
    assert_eq!(genome(&engine).chromosomes_filtered().len(), 25);

    engine.go_forward();
    assert_eq!(genome(&engine).chromosomes_filtered(), ["5"]);
}

#[test]
fn unknown_chromosomes_are_rejected_up_front() {
    let mut scale = GenomeScale::new("genome_coordinate", "Genome coordinate");
    assert!(scale.filter_by_chromosome("chr99").is_err());
    assert!(scale.convert_position_to_ratio("W", 1).is_err());
    assert_eq!(scale.chromosomes_filtered().len(), 25);
}

#[test]
fn human_labels_group_positions_by_thousands() {
    let scale = GenomeScale::new("genome_coordinate", "Genome coordinate");
    assert_eq!(scale.to_human("5", 1_234_567), "chr5:1,234,567");
    assert_eq!(scale.to_human("X", 17), "chrX:17");
}
