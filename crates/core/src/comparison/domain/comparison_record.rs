use std::fmt;

use serde::Serialize;

use crate::shared::constants::SSIM_PRECISION;

/// One scored frame pair. `index` is 1-based; `keyframe_pos` is the position
/// of the transformed stream's latest keyframe when the pair was read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub index: usize,
    pub keyframe_pos: i64,
    pub ssim: f64,
}

impl fmt::Display for ComparisonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.*}",
            self.index, self.keyframe_pos, SSIM_PRECISION, self.ssim
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::perfect(1, 0, 1.0, "1 0 1.000000")]
    #[case::rounded(12, 48213, 0.98765449, "12 48213 0.987654")]
    #[case::negative(3, 700, -0.25, "3 700 -0.250000")]
    fn test_display_format(
        #[case] index: usize,
        #[case] keyframe_pos: i64,
        #[case] ssim: f64,
        #[case] expected: &str,
    ) {
        let record = ComparisonRecord {
            index,
            keyframe_pos,
            ssim,
        };
        assert_eq!(record.to_string(), expected);
    }
}
