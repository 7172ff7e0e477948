// Copyright (c) 2021 CRUK Cambridge Institute - Bioinformatics Core
// Licensed under the MIT license (http://opensource.org/licenses/MIT)
// This file may not be copied, modified, or distributed
// except according to those terms.

//! A Rust library providing functions for building and annotating the gene
//! abundance tables of a metagenomics pipeline: extracting per-sample
//! statistics from read mapping results, joining sample tables, merging
//! abundances with eggNOG functional annotations and cleaning up the merged
//! table, plus amino acid composition of assembled genomes.

pub mod aggregate;
pub mod amino_acid;
pub mod annotation;
pub mod merge;
pub mod normalize;
pub mod sample;
pub mod table;
