//! # Distribution Environment
//!
//! Rank and world size for multi-process runs, read from the OpenMPI
//! environment. The engine itself is oblivious to these; they partition
//! datasets and name shard files.

/// The environment variable naming this process's rank.
pub const RANK_ENV: &str = "OMPI_COMM_WORLD_RANK";

/// The environment variable naming the process count.
pub const WORLD_SIZE_ENV: &str = "OMPI_COMM_WORLD_SIZE";

fn parse_or<Tgt: std::str::FromStr>(
    value: Option<String>,
    default: Tgt,
) -> Tgt {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Read `(rank, world_size)` from the environment.
///
/// Defaults to `(0, 1)` outside a distributed launch; a world size below 1
/// is clamped to 1.
pub fn rank_and_world_size() -> (usize, usize) {
    let rank = parse_or(std::env::var(RANK_ENV).ok(), 0);
    let world_size = parse_or(std::env::var(WORLD_SIZE_ENV).ok(), 1);
    (rank, world_size.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or() {
        assert_eq!(parse_or(None, 0usize), 0);
        assert_eq!(parse_or(Some("3".to_string()), 0usize), 3);
        assert_eq!(parse_or(Some("nope".to_string()), 1usize), 1);
    }

    #[test]
    fn test_defaults_without_env() {
        // Test binaries are not launched under mpirun.
        if std::env::var(RANK_ENV).is_err() && std::env::var(WORLD_SIZE_ENV).is_err() {
            assert_eq!(rank_and_world_size(), (0, 1));
        }
    }
}
