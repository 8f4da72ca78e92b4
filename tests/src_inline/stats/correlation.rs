use super::*;

fn some(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

#[test]
fn test_reference_correlation() {
    let x = some(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let y = some(&[10.0, 9.0, 2.5, 6.0, 4.0]);
    let c = pearson(&x, &y).unwrap().unwrap();
    assert_eq!(c.n, 5);
    assert!((c.r - -0.7426106572325057).abs() < 1e-12);
    assert!((c.p_value - 0.1505558088534455).abs() < 1e-6, "p = {}", c.p_value);
}

#[test]
fn test_missing_positions_masked_in_both_vectors() {
    let mut x = some(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let mut y = some(&[10.0, 9.0, 2.5, 6.0, 4.0]);
    x.push(None);
    y.push(Some(100.0));
    x.insert(0, Some(-50.0));
    y.insert(0, None);

    let c = pearson(&x, &y).unwrap().unwrap();
    assert_eq!(c.n, 5);
    assert!((c.r - -0.7426106572325057).abs() < 1e-12);
}

#[test]
fn test_perfect_correlation() {
    let x = some(&[1.0, 2.0, 3.0, 4.0]);
    let y = some(&[3.0, 5.0, 7.0, 9.0]);
    let c = pearson(&x, &y).unwrap().unwrap();
    assert!((c.r - 1.0).abs() < 1e-12);
    assert!(c.p_value < 1e-6);
}

#[test]
fn test_undefined_correlations() {
    let x = some(&[1.0, 2.0, 3.0]);
    let flat = some(&[4.0, 4.0, 4.0]);
    assert_eq!(pearson(&x, &flat).unwrap(), None);

    let sparse = vec![Some(1.0), None, Some(2.0)];
    assert_eq!(pearson(&x, &sparse).unwrap(), None);

    let all_missing = vec![None, None, None];
    assert_eq!(pearson(&all_missing, &x).unwrap(), None);
}

#[test]
fn test_length_mismatch() {
    let x = some(&[1.0, 2.0, 3.0]);
    let y = some(&[1.0, 2.0]);
    assert_eq!(
        pearson(&x, &y),
        Err(StatsError::LengthMismatch { left: 3, right: 2 })
    );
}
