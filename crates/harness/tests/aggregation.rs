use batchtree_core::{pmfm_ids, MethodId, QualityFlag, Weight};
use batchtree_engine::{
    clean_tree, compute_individual_count, compute_rank_order, BatchTreeEngine, EngineError,
};
use batchtree_harness::TreeBuilder;
use batchtree_model::{sum_observed_individual_count, AcquisitionLevel, Batch};

fn sampling_weight(sorting: &Batch) -> Option<f64> {
    sorting.get_sampling_child()?.weight.as_ref()?.value()
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn cod_individuals_give_sampling_count_and_weight() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5).individual(0.5))
        .build();

    engine.compute_tree(&mut root)?;

    let sorting = &root.children[0];
    let sampling = sorting.get_sampling_child().ok_or("no sampling batch")?;
    assert_eq!(sampling.label(), "SORTING_BATCH#1.%");
    assert_eq!(sampling.individual_count, Some(2));
    assert_eq!(sampling.parent_id, sorting.id);

    let weight = sampling.weight.as_ref().ok_or("no sampling weight")?;
    assert_eq!(weight.value(), Some(1.0));
    assert_eq!(weight.method_id, Some(MethodId::Calculated));
    assert!(weight.computed);
    assert_eq!(
        sampling.measurement_values.get_number(pmfm_ids::BATCH_CALCULATED_WEIGHT),
        Some(1.0)
    );
    assert_eq!(sorting.quality_flag, QualityFlag::NotQualified);

    Ok(())
}

#[test]
fn several_species_are_weighed_apart() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(1.25).individual(0.75))
        .sorting("HAD", |s| s.length_weight_individual(0.3).length_weight_individual(0.2))
        .sorting("WHG", |s| s.weight(4.0))
        .build();

    engine.compute_tree(&mut root)?;

    assert_eq!(sampling_weight(&root.children[0]), Some(2.0));

    let had = root.children[1].get_sampling_child().ok_or("no HAD sampling batch")?;
    let had_weight = had.weight.as_ref().ok_or("no HAD weight")?;
    assert_eq!(had_weight.value(), Some(0.5));
    assert_eq!(had_weight.method_id, Some(MethodId::CalculatedWeightLengthSum));

    // no individuals, nothing to aggregate
    assert!(root.children[2].children.is_empty());
    assert_eq!(
        root.children[2].weight.as_ref().and_then(Weight::value),
        Some(4.0)
    );

    Ok(())
}

#[test]
fn sub_sorting_under_sampling_is_weighed() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("NEP", |s| {
            s.sampling("1/2", |sc| {
                sc.sorting(|male| male.individual(0.1).individual(0.2))
                    .sorting(|female| female.individual(0.4))
            })
        })
        .build();

    engine.compute_tree(&mut root)?;

    let sampling = root.children[0].get_sampling_child().ok_or("no sampling batch")?;
    assert_eq!(sampling.sampling_ratio_text.as_deref(), Some("1/2"));
    assert_eq!(sampling_weight(&sampling.children[0]), Some(0.3));
    assert_eq!(sampling_weight(&sampling.children[1]), Some(0.4));
    let male_count = sampling.children[0]
        .get_sampling_child()
        .and_then(|b| b.individual_count);
    assert_eq!(male_count, Some(2));

    Ok(())
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn passes_are_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.4).individual(0.35).individual_count(5))
        .sorting("HAD", |s| s.individual(0.123).unweighed_individual())
        .sorting("NEP", |s| s.sampling("50%", |sc| sc.individual(0.1)))
        .build();

    assert!(engine.prepare_for_save(&mut root)?);
    let once = root.clone();
    assert!(engine.prepare_for_save(&mut root)?);
    assert_eq!(root, once);

    Ok(())
}

#[test]
fn entered_count_matching_individuals_is_stable() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5).individual(0.5).individual_count(2))
        .build();

    engine.compute_tree(&mut root)?;
    let once = root.clone();
    engine.compute_tree(&mut root)?;
    assert_eq!(root, once);

    let sampling = root.children[0].get_sampling_child().ok_or("no sampling batch")?;
    assert_eq!(sampling.individual_count, Some(2));
    assert_eq!(sampling.weight.as_ref().and_then(Weight::value), Some(1.0));

    Ok(())
}

#[test]
fn low_entered_count_is_stable() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5).individual(0.5).individual_count(1))
        .build();

    engine.compute_tree(&mut root)?;
    let once = root.clone();
    engine.compute_tree(&mut root)?;
    assert_eq!(root, once);

    let sorting = &root.children[0];
    assert_eq!(sorting.quality_flag, QualityFlag::Bad);
    assert_eq!(sorting.individual_count, Some(1));
    let sampling = sorting.get_sampling_child().ok_or("no sampling batch")?;
    assert_eq!(sampling.individual_count, Some(2));

    Ok(())
}

#[test]
fn rank_orders_are_contiguous() -> Result<(), Box<dyn std::error::Error>> {
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.1).individual(0.2).individual(0.3))
        .sorting("HAD", |s| s.individual(0.1))
        .build();
    // scramble: drop the middle individual and shuffle ranks
    let cod = &mut root.children[0];
    cod.children.remove(1);
    cod.children[0].rank_order = Some(9);
    cod.children[1].rank_order = None;
    root.children[1].rank_order = Some(5);

    compute_rank_order(&mut root)?;

    let mut ranks = Vec::new();
    root.walk(&mut |batch: &Batch| {
        let children: Vec<_> = batch.children.iter().map(|c| c.rank_order).collect();
        ranks.push(children);
    });
    for children in ranks {
        let expected: Vec<_> = (1..=children.len() as i32).map(Some).collect();
        assert_eq!(children, expected);
    }
    assert_eq!(root.children[0].children[0].label(), "SORTING_BATCH_INDIVIDUAL#1");

    Ok(())
}

#[test]
fn sampling_counts_match_observed_individuals() -> Result<(), Box<dyn std::error::Error>> {
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.1).individual(0.2).unweighed_individual())
        .sorting("HAD", |s| s.individual(0.5))
        .build();

    compute_individual_count(&mut root)?;

    for sorting in &root.children {
        let sampling = sorting.get_sampling_child().ok_or("no sampling batch")?;
        assert_eq!(
            sampling.individual_count,
            Some(sum_observed_individual_count(&sampling.children))
        );
    }

    Ok(())
}

#[test]
fn weights_are_conserved() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let weights = [0.125, 0.25, 0.375, 0.5];
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| {
            weights.iter().fold(s, |s, w| s.individual(*w))
        })
        .build();

    engine.compute_tree(&mut root)?;

    let expected: f64 = weights.iter().sum();
    assert_eq!(sampling_weight(&root.children[0]), Some(expected));

    Ok(())
}

#[test]
fn weight_sums_are_rounded_to_grams() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(1.2345).individual(2.3456))
        .build();

    engine.compute_tree(&mut root)?;
    assert_eq!(sampling_weight(&root.children[0]), Some(3.58));

    Ok(())
}

// ============================================================================
// Inconsistencies
// ============================================================================

#[test]
fn low_individual_count_is_flagged_bad() -> Result<(), Box<dyn std::error::Error>> {
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5).individual(0.5).individual_count(1))
        .build();

    compute_individual_count(&mut root)?;

    let sorting = &root.children[0];
    assert_eq!(sorting.quality_flag, QualityFlag::Bad);
    assert_eq!(sorting.individual_count, Some(1));
    assert!(sorting.get_sampling_child().is_none());

    Ok(())
}

#[test]
fn high_individual_count_goes_to_sampling() -> Result<(), Box<dyn std::error::Error>> {
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5).individual(0.5).individual_count(10))
        .build();

    compute_individual_count(&mut root)?;

    let sorting = &root.children[0];
    assert_eq!(sorting.quality_flag, QualityFlag::NotQualified);
    assert_eq!(sorting.individual_count, Some(10));
    let sampling = sorting.get_sampling_child().ok_or("no sampling batch")?;
    assert_eq!(sampling.individual_count, Some(2));

    Ok(())
}

#[test]
fn low_observed_weight_is_flagged_bad() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5).individual(0.5).weight(0.9))
        .build();

    engine.compute_weight(&mut root)?;

    let sorting = &root.children[0];
    assert_eq!(sorting.quality_flag, QualityFlag::Bad);
    assert_eq!(sorting.weight.as_ref().and_then(Weight::value), Some(0.9));

    Ok(())
}

#[test]
fn unweighed_individual_blocks_the_sum() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5).unweighed_individual())
        .build();

    engine.compute_tree(&mut root)?;

    let sampling = root.children[0].get_sampling_child().ok_or("no sampling batch")?;
    assert_eq!(sampling.individual_count, Some(2));
    assert_eq!(sampling.weight, None);

    Ok(())
}

#[test]
fn unlabelled_root_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5))
        .build();
    root.set_label("");

    let err = engine.compute_tree(&mut root).unwrap_err();
    assert!(matches!(err, EngineError::MissingLabel));

    Ok(())
}

// ============================================================================
// Cleanup
// ============================================================================

#[test]
fn cleanup_drops_only_empty_leaves() -> Result<(), Box<dyn std::error::Error>> {
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.individual(0.5))
        .sorting("HAD", |s| s)
        .build();
    root.children[0]
        .children
        .push(Batch::new("SORTING_BATCH_INDIVIDUAL#2"));

    assert!(!clean_tree(&mut root));
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].children.len(), 1);

    let mut empty = TreeBuilder::catch().sorting("COD", |s| s).build();
    assert!(clean_tree(&mut empty));

    Ok(())
}

// ============================================================================
// Tree queries
// ============================================================================

#[test]
fn individuals_found_by_level_after_aggregation() -> Result<(), Box<dyn std::error::Error>> {
    let engine = BatchTreeEngine::default();
    let mut root = TreeBuilder::catch()
        .sorting("COD", |s| s.taxon_name("Gadus morhua").individual(0.5).individual(0.5))
        .sorting("HAD", |s| s.individual(0.25))
        .build();

    engine.compute_tree(&mut root)?;

    let individuals = root.get_children_by_level(AcquisitionLevel::SortingBatchIndividual);
    assert_eq!(individuals.len(), 3);
    assert!(root.children[1].has_children_with_level(AcquisitionLevel::SortingBatchIndividual));
    assert_eq!(
        root.get_children_by_level(AcquisitionLevel::SortingBatch).len(),
        2
    );
    assert_eq!(root.children[0].parent_to_string(), "COD / Gadus morhua");
    assert_eq!(root.children[1].parent_to_string(), "HAD");

    Ok(())
}
