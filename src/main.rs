fn main() -> anyhow::Result<()> {
    cs2d_tileless::run()
}
