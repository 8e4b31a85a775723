fn main() {
    vsm_pipeline::cli::run();
}
