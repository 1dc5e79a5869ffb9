/// Marker for identities owned by the external account service.
/// The engine only ever sees their ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct User;
