fn main() -> ontoform::Result<()> {
    ontoform::cli::main()
}
