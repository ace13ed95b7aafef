/// Side of the square SSIM window, in pixels.
pub const SSIM_WINDOW: usize = 8;

/// Step between neighbouring SSIM windows.
pub const SSIM_STRIDE: usize = 4;

/// Stabilising constants for 8-bit dynamic range: (0.01 * 255)^2 and (0.03 * 255)^2.
pub const SSIM_C1: f64 = 6.5025;
pub const SSIM_C2: f64 = 58.5225;

/// Decimal places printed for each SSIM score.
pub const SSIM_PRECISION: usize = 6;

pub const DEFAULT_PROGRESS_EVERY: usize = 100;
