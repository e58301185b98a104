pub(crate) mod active_hunts;
pub(crate) mod boundary;
pub(crate) mod hunt_logs;
pub(crate) mod quota;
pub(crate) mod users;
