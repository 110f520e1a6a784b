fn main() -> anyhow::Result<()> {
    relget::cli::run()
}
