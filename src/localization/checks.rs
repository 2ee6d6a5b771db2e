//! Accuracy checks run against every pose sample.

use super::PoseSample;
use crate::config::LocalizationConfig;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A reason a pose sample cannot be trusted.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccuracyViolation {
    #[error("Device is not tracking")]
    NotTracking,

    #[error("Pose accuracy is unavailable")]
    MissingAccuracy,

    #[error("Yaw accuracy {value:.1} deg exceeds {limit:.1} deg")]
    YawTooCoarse { value: f64, limit: f64 },

    #[error("Horizontal accuracy {value:.1} m exceeds {limit:.1} m")]
    HorizontalTooCoarse { value: f64, limit: f64 },
}

/// Run every accuracy check, accumulating all failures.
///
/// The accuracy bounds are inclusive: a yaw accuracy equal to the threshold
/// still passes.
pub fn check_sample(
    sample: &PoseSample,
    config: &LocalizationConfig,
) -> Validation<(), NonEmptyVec<AccuracyViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<AccuracyViolation>>> = Vec::new();

    checks.push(if sample.tracking {
        Validation::success(())
    } else {
        Validation::fail(AccuracyViolation::NotTracking)
    });

    match sample.accuracy {
        None => checks.push(Validation::fail(AccuracyViolation::MissingAccuracy)),
        Some(accuracy) => {
            let yaw_limit = config.yaw_accuracy_threshold_deg;
            checks.push(if accuracy.yaw_deg <= yaw_limit {
                Validation::success(())
            } else {
                Validation::fail(AccuracyViolation::YawTooCoarse {
                    value: accuracy.yaw_deg,
                    limit: yaw_limit,
                })
            });

            let horizontal_limit = config.horizontal_accuracy_threshold_m;
            checks.push(if accuracy.horizontal_m <= horizontal_limit {
                Validation::success(())
            } else {
                Validation::fail(AccuracyViolation::HorizontalTooCoarse {
                    value: accuracy.horizontal_m,
                    limit: horizontal_limit,
                })
            });
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn here() -> Coordinate {
        Coordinate::new(34.41, -119.85)
    }

    #[test]
    fn accurate_sample_passes() {
        let config = LocalizationConfig::default();
        let sample = PoseSample::tracked(here(), 5.0, 3.0);
        assert!(check_sample(&sample, &config).is_success());
    }

    #[test]
    fn thresholds_are_inclusive() {
        let config = LocalizationConfig::default();
        let sample = PoseSample::tracked(here(), 25.0, 20.0);
        assert!(check_sample(&sample, &config).is_success());
    }

    #[test]
    fn accumulates_every_coarse_reading() {
        let config = LocalizationConfig::default();
        let mut sample = PoseSample::tracked(here(), 40.0, 35.0);
        sample.tracking = false;

        match check_sample(&sample, &config) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, AccuracyViolation::NotTracking)));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, AccuracyViolation::YawTooCoarse { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, AccuracyViolation::HorizontalTooCoarse { .. })));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn untracked_sample_reports_missing_accuracy() {
        let config = LocalizationConfig::default();
        match check_sample(&PoseSample::untracked(here()), &config) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, AccuracyViolation::MissingAccuracy)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn single_coarse_axis_fails_alone() {
        let config = LocalizationConfig::default();
        match check_sample(&PoseSample::tracked(here(), 10.0, 20.5), &config) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.iter().all(|e| matches!(
                    e,
                    AccuracyViolation::HorizontalTooCoarse { value, limit }
                        if *value == 20.5 && *limit == 20.0
                )));
            }
            Validation::Success(_) => panic!("Expected failure, got success"),
        }
    }
}
