fn main() -> anyhow::Result<()> {
    trainer_local::run()
}
