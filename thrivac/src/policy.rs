/// The visibility policy for directory resources.
///
/// Rules, first match wins:
///
/// - administrators may view, edit and delete everything;
/// - anonymous agents may only view approved public resources;
/// - other users may view approved resources that are either public or
///   belong to their home institution, and may view, edit and delete any
///   resource that lists their address as an owner.
#[derive(Clone, Copy, Debug, Default)]
pub struct PolicyEnforcer;

mod impls;
