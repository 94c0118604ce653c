/// Bundles the flanger through nih_plug_xtask. Usage:
///
///   cargo xtask bundle loveless-flanger-v1 --release
///
/// The bundles land in `target/bundled/` as `Loveless Flanger.vst3` and
/// `Loveless Flanger.clap`.
fn main() -> nih_plug_xtask::Result<()> {
    nih_plug_xtask::main()
}
