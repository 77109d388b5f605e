//! Compute device candidates for in-process models.
//!
//! Acquisition walks an ordered list of candidates and keeps the first device
//! on which the model loads. Which device wins only changes latency, never the
//! embeddings themselves.

use std::fmt;
use std::str::FromStr;

use crate::error::LlmError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Cpu,
    Cuda(usize),
    Metal(usize),
}

impl DeviceKind {
    #[must_use]
    pub fn is_accelerated(self) -> bool {
        !matches!(self, Self::Cpu)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            Self::Cuda(n) => write!(f, "cuda:{n}"),
            Self::Metal(n) => write!(f, "metal:{n}"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let (name, ordinal) = match normalized.split_once(':') {
            Some((name, ordinal)) => {
                let ordinal = ordinal
                    .parse::<usize>()
                    .map_err(|_| LlmError::InvalidDevice(s.to_owned()))?;
                (name, ordinal)
            }
            None => (normalized.as_str(), 0),
        };

        match name {
            "cpu" if ordinal == 0 => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda(ordinal)),
            "metal" => Ok(Self::Metal(ordinal)),
            _ => Err(LlmError::InvalidDevice(s.to_owned())),
        }
    }
}

/// Parse a list of device names, preserving order.
///
/// # Errors
///
/// Returns the first entry that is not a valid device name.
pub fn parse_candidates<S: AsRef<str>>(names: &[S]) -> Result<Vec<DeviceKind>, LlmError> {
    names.iter().map(|n| n.as_ref().parse()).collect()
}

/// One failed acquisition attempt.
#[derive(Debug)]
pub struct DeviceAttempt {
    pub device: DeviceKind,
    pub error: LlmError,
}

impl fmt::Display for DeviceAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.device, self.error)
    }
}

/// Try `load` on every candidate in order and return the first success.
///
/// # Errors
///
/// Returns every failed attempt, in order, when no candidate succeeds. An
/// empty candidate list yields an empty attempt list.
pub fn acquire_on_first<T, F>(
    candidates: &[DeviceKind],
    mut load: F,
) -> Result<(T, DeviceKind), Vec<DeviceAttempt>>
where
    F: FnMut(DeviceKind) -> Result<T, LlmError>,
{
    let mut attempts = Vec::with_capacity(candidates.len());
    for &device in candidates {
        match load(device) {
            Ok(value) => {
                if !attempts.is_empty() {
                    tracing::info!(
                        %device,
                        "fell back to device after {} failed attempt(s)",
                        attempts.len()
                    );
                }
                return Ok((value, device));
            }
            Err(error) => {
                tracing::warn!(%device, "device acquisition failed: {error}");
                attempts.push(DeviceAttempt { device, error });
            }
        }
    }
    Err(attempts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_names() {
        assert_eq!("cpu".parse::<DeviceKind>().unwrap(), DeviceKind::Cpu);
        assert_eq!("cuda".parse::<DeviceKind>().unwrap(), DeviceKind::Cuda(0));
        assert_eq!("metal".parse::<DeviceKind>().unwrap(), DeviceKind::Metal(0));
    }

    #[test]
    fn parse_with_ordinal_and_case() {
        assert_eq!(" CUDA:1 ".parse::<DeviceKind>().unwrap(), DeviceKind::Cuda(1));
        assert_eq!("metal:2".parse::<DeviceKind>().unwrap(), DeviceKind::Metal(2));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("tpu".parse::<DeviceKind>().is_err());
        assert!("cuda:x".parse::<DeviceKind>().is_err());
        assert!("cpu:1".parse::<DeviceKind>().is_err());
        assert!("".parse::<DeviceKind>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for device in [DeviceKind::Cpu, DeviceKind::Cuda(3), DeviceKind::Metal(0)] {
            assert_eq!(device.to_string().parse::<DeviceKind>().unwrap(), device);
        }
    }

    #[test]
    fn parse_candidates_keeps_order() {
        let devices = parse_candidates(&["cuda:0", "cpu"]).unwrap();
        assert_eq!(devices, vec![DeviceKind::Cuda(0), DeviceKind::Cpu]);
    }

    #[test]
    fn parse_candidates_reports_bad_entry() {
        let err = parse_candidates(&["cpu", "gpu"]).unwrap_err();
        assert!(err.to_string().contains("gpu"));
    }

    #[test]
    fn accelerated_flag() {
        assert!(!DeviceKind::Cpu.is_accelerated());
        assert!(DeviceKind::Cuda(0).is_accelerated());
        assert!(DeviceKind::Metal(0).is_accelerated());
    }

    #[test]
    fn first_success_wins() {
        let (value, device) = acquire_on_first(&[DeviceKind::Cuda(0), DeviceKind::Cpu], |d| {
            Ok::<_, LlmError>(d.to_string())
        })
        .unwrap();
        assert_eq!(value, "cuda:0");
        assert_eq!(device, DeviceKind::Cuda(0));
    }

    #[test]
    fn falls_back_after_failure() {
        let mut tried = Vec::new();
        let (_, device) = acquire_on_first(&[DeviceKind::Cuda(0), DeviceKind::Cpu], |d| {
            tried.push(d);
            if d.is_accelerated() {
                Err(LlmError::DeviceUnavailable {
                    device: d.to_string(),
                    reason: "out of memory".into(),
                })
            } else {
                Ok(())
            }
        })
        .unwrap();
        assert_eq!(device, DeviceKind::Cpu);
        assert_eq!(tried, vec![DeviceKind::Cuda(0), DeviceKind::Cpu]);
    }

    #[test]
    fn all_failures_are_reported_in_order() {
        let attempts = acquire_on_first(&[DeviceKind::Metal(0), DeviceKind::Cpu], |d| {
            Err::<(), _>(LlmError::ModelLoad(format!("broken on {d}")))
        })
        .unwrap_err();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[0].device, DeviceKind::Metal(0));
        assert!(attempts[1].to_string().starts_with("cpu: "));
    }

    #[test]
    fn empty_candidates_fail_without_attempts() {
        let attempts = acquire_on_first(&[], |_| Ok::<_, LlmError>(())).unwrap_err();
        assert!(attempts.is_empty());
    }

    proptest::proptest! {
        #[test]
        fn accelerator_ordinals_parse(ordinal in 0usize..64, metal in proptest::bool::ANY) {
            let (name, expected) = if metal {
                (format!("metal:{ordinal}"), DeviceKind::Metal(ordinal))
            } else {
                (format!("cuda:{ordinal}"), DeviceKind::Cuda(ordinal))
            };
            proptest::prop_assert_eq!(name.parse::<DeviceKind>().unwrap(), expected);
            proptest::prop_assert_eq!(expected.to_string(), name);
        }
    }
}
