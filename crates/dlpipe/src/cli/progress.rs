use std::time::Duration;

use dlpipe_fetch::Progress;
use indicatif::HumanBytes;

pub const INTERVAL: Duration = Duration::from_secs(10);

pub fn render(progress: &Progress) -> String {
    let current = HumanBytes(progress.bytes_downloaded);
    let rate = HumanBytes(progress.rate_bps as u64);
    match (progress.total_bytes, progress.percentage()) {
        (Some(total), Some(percent)) => format!(
            "Downloaded {current} of {} ({percent:.1}%) at {rate}/s",
            HumanBytes(total)
        ),
        _ => format!("Downloaded {current} at {rate}/s"),
    }
}

pub fn report(progress: &Progress) { eprintln!("{}", render(progress)); }

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(bytes_downloaded: u64, total_bytes: Option<u64>, rate_bps: f64) -> Progress {
        Progress {
            bytes_downloaded,
            total_bytes,
            rate_bps,
            elapsed: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_render_with_total() {
        assert_eq!(
            render(&progress(512, Some(1024), 256.0)),
            "Downloaded 512 B of 1.00 KiB (50.0%) at 256 B/s"
        );
    }

    #[test]
    fn test_render_unknown_total() {
        assert_eq!(
            render(&progress(3 * 1024 * 1024, None, 1024.0 * 1024.0)),
            "Downloaded 3.00 MiB at 1.00 MiB/s"
        );
    }
}
