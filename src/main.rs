fn main() -> anyhow::Result<()> {
    workout_tracker::run()
}
