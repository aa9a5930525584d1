//! A registration book servers fill in at startup so the health-check API
//! knows which services exist and how to probe them, without the two
//! binaries having to know about each other's types.
use std::fmt;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// One service's entry in the registar: where it's bound and where to send
/// an HTTP `GET` to check it's alive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceHealthCheckJob {
    /// The address the service is bound to.
    pub binding: SocketAddr,

    /// A human-readable description of the check, shown in the health
    /// report, e.g. `"checking peer-session health check at:
    /// http://0.0.0.0:7272/health_check"`.
    pub info: String,

    /// The URL the health-check API will `GET` to determine this service's
    /// health.
    pub health_check_url: String,
}

/// A handle a service uses to register itself. Obtained from
/// [`Registar::give_form`] and submitted once, when the service starts
/// listening.
#[derive(Clone, Debug)]
pub struct Form {
    jobs: Arc<Mutex<Vec<ServiceHealthCheckJob>>>,
}

impl Form {
    /// Registers `job` with the registar this form was obtained from.
    ///
    /// # Panics
    ///
    /// Panics if the registar's internal lock is poisoned.
    pub fn submit(&self, job: ServiceHealthCheckJob) {
        self.jobs.lock().expect("registar lock poisoned").push(job);
    }
}

/// Collects the health-check jobs of every running service. Shared between
/// the services (which submit a [`ServiceHealthCheckJob`] via a [`Form`])
/// and the health-check API (which reads [`Registar::entries`] to probe
/// them).
#[derive(Clone, Debug, Default)]
pub struct Registar {
    jobs: Arc<Mutex<Vec<ServiceHealthCheckJob>>>,
}

impl Registar {
    /// Hands out a [`Form`] a service can use to register itself.
    #[must_use]
    pub fn give_form(&self) -> Form {
        Form { jobs: self.jobs.clone() }
    }

    /// Returns the jobs registered so far.
    ///
    /// # Panics
    ///
    /// Panics if the registar's internal lock is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<ServiceHealthCheckJob> {
        self.jobs.lock().expect("registar lock poisoned").clone()
    }
}

impl fmt::Display for ServiceHealthCheckJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.info)
    }
}
