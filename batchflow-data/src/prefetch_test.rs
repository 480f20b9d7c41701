use batchflow_core::BatchFlowError;

use crate::prefetch::ordered_fetch;

#[test]
fn results_come_back_in_job_order() {
    let results = ordered_fetch(16, |i| {
        // uneven work so completion order differs from job order
        std::thread::sleep(std::time::Duration::from_micros(((16 - i) * 50) as u64));
        Ok(i * 3)
    });
    let values: Vec<usize> = results.into_iter().map(|r| r.expect("no errors")).collect();
    assert_eq!(values, (0..16).map(|i| i * 3).collect::<Vec<_>>());
}

#[test]
fn errors_keep_their_position() {
    let results = ordered_fetch(6, |i| {
        if i == 3 {
            Err(BatchFlowError::LoaderError("job 3 failed".to_string()))
        } else {
            Ok(i)
        }
    });
    assert_eq!(results.len(), 6);
    for (i, result) in results.iter().enumerate() {
        if i == 3 {
            assert!(result.is_err());
        } else {
            assert_eq!(result.as_ref().ok(), Some(&i));
        }
    }
}

#[test]
fn zero_jobs_is_a_no_op() {
    let results: Vec<Result<usize, BatchFlowError>> = ordered_fetch(0, |i| Ok(i));
    assert!(results.is_empty());
}
