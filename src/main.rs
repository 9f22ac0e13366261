use parilut::{create_kernels, refine_factor, Backend, ParIlutConfig, SparseMatrixCSR};

fn main() {
    println!("ParILUT kernels v{}", parilut::VERSION);

    // Lower factor of a small 4x4 system
    let factor = SparseMatrixCSR::new(
        4, 4,
        vec![0, 1, 3, 5, 7],
        vec![0, 0, 1, 1, 2, 0, 3],
        vec![1.0f64, 0.5, 1.0, -0.25, 1.0, 0.05, 1.0],
    );

    // Candidate fill-in from the residual
    let candidates = SparseMatrixCSR::new(
        4, 4,
        vec![0, 0, 0, 1, 3],
        vec![0, 1, 2],
        vec![0.75f64, 0.01, -0.6],
    );

    println!("\nFactor:");
    println!("{:?}", factor);

    println!("\nCandidates:");
    println!("{:?}", candidates);

    let target_nnz = factor.nnz();
    println!("\nTarget nonzeros: {}", target_nnz);

    for backend in Backend::ALL {
        let config = ParIlutConfig::for_backend(backend);
        if backend.is_parallel() {
            println!("\nBackend: {} ({} threads)", backend.name(), config.system_params.n_threads);
        } else {
            println!("\nBackend: {} (sequential)", backend.name());
        }

        let kernels = match create_kernels::<f64>(&config) {
            Ok(kernels) => kernels,
            Err(err) => {
                println!("  Failed to create kernels: {}", err);
                continue;
            }
        };

        match refine_factor(kernels.as_ref(), &factor, &candidates, target_nnz) {
            Ok((refined, summary)) => {
                println!("  Intermediate nonzeros: {}", summary.intermediate_nnz);
                if let (Some(rank), Some(threshold)) = (summary.rank, summary.threshold) {
                    println!("  Rank: {}  Threshold: {}", rank, threshold);
                }
                println!("  Refined nonzeros: {}", summary.result_nnz);
                println!("  Stored diagonal entries: {}", refined.diagonal_count());
            }
            Err(err) => println!("  Refinement failed: {}", err),
        }
    }
}
