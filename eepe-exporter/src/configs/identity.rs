use std::fmt;

/// Account and device the exporter acts on behalf of. Fixed for the life of the process.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub password: String,
    pub serial_number: String,
    /// Network address of the device, `host` or `host:port`.
    pub host: String,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("username", &self.username)
            .field("password", &"***")
            .field("serial_number", &self.serial_number)
            .field("host", &self.host)
            .finish()
    }
}
