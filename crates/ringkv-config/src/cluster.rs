use crate::error::{ConfigError, Result};
use crate::placement::{preference_list, primary_of};

/// Static cluster parameters: how many servers exist, and how many of them
/// hold a replica of any given key.
///
/// Construction validates `nreplicas <= nservers` rather than trusting the
/// caller, since a larger replica count than the server count has no
/// sensible placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConfig {
    pub nservers: usize,
    pub nreplicas: usize,
}

impl ClusterConfig {
    pub fn new(nservers: usize, nreplicas: usize) -> Result<Self> {
        if nservers == 0 {
            return Err(ConfigError::NoServers);
        }
        if nreplicas > nservers {
            return Err(ConfigError::TooManyReplicas {
                nreplicas,
                nservers,
            });
        }
        Ok(Self {
            nservers,
            nreplicas,
        })
    }

    /// The primary server for `key`.
    pub fn primary_of(&self, key: &str) -> usize {
        primary_of(key, self.nservers)
    }

    /// The ordered preference list for `key`, primary first.
    pub fn preference_list(&self, key: &str) -> Vec<usize> {
        preference_list(key, self.nservers, self.nreplicas)
    }

    /// Whether `server_id` is a member of `key`'s preference list.
    pub fn is_member(&self, server_id: usize, key: &str) -> bool {
        self.preference_list(key).contains(&server_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_many_replicas() {
        assert_eq!(
            ClusterConfig::new(3, 4),
            Err(ConfigError::TooManyReplicas {
                nreplicas: 4,
                nservers: 3
            })
        );
    }

    #[test]
    fn rejects_zero_servers() {
        assert_eq!(ClusterConfig::new(0, 0), Err(ConfigError::NoServers));
    }

    #[test]
    fn accepts_nreplicas_equal_to_nservers() {
        assert!(ClusterConfig::new(3, 3).is_ok());
    }

    #[test]
    fn membership_matches_preference_list() {
        let cfg = ClusterConfig::new(3, 2).unwrap();
        let list = cfg.preference_list("5");
        for id in 0..cfg.nservers {
            assert_eq!(cfg.is_member(id, "5"), list.contains(&id));
        }
    }
}
