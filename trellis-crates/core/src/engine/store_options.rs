/// Options which influence how the [`Store`](super::Store) drives propagation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct StoreOptions {
    /// Increase the weight of the arguments of a constraint every time it fails.
    #[cfg_attr(feature = "clap", arg(long = "increase-weights-on-failure"))]
    pub increase_weights_on_failure: bool,
    /// Run every propagator a second time after it returns and warn when the second run narrows
    /// any domain. Only useful when debugging propagators.
    #[cfg_attr(feature = "clap", arg(long = "check-fixpoints"))]
    pub check_fixpoints: bool,
}
