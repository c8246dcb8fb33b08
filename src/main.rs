use std::ffi::OsStr;
use std::fs::{create_dir_all, read_dir};
use std::path::{Path, PathBuf};
use clap::{App, Arg, ArgMatches, value_t};
use log::{error, info, warn};
use spvpipe::spv::{SpirvBinary, LayoutConverter, MatrixLayout};
use spvpipe::gfx::{PipelineInterface, PipelineLayoutConfig};

fn main() {
    env_logger::init();

    let matches = App::new("spvpipe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reflect the pipeline interface of a set of SPIR-V modules")
        .arg(Arg::with_name("row-major")
            .long("row-major")
            .conflicts_with("col-major")
            .help("Rewrite matrix layout decorations to row-major"))
        .arg(Arg::with_name("col-major")
            .long("col-major")
            .help("Rewrite matrix layout decorations to column-major"))
        .arg(Arg::with_name("out")
            .long("out")
            .value_name("DIR")
            .takes_value(true)
            .help("Directory the rewritten modules are saved to"))
        .arg(Arg::with_name("binding")
            .long("binding")
            .value_name("N")
            .takes_value(true)
            .default_value("0")
            .help("Binding point of the per-vertex buffer"))
        .arg(Arg::with_name("INPUT")
            .required(true)
            .multiple(true)
            .help("SPIR-V files, or directories containing `*.spv` files"))
        .get_matches();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let vert_bind_point = value_t!(matches, "binding", u32)?;
    let layout = if matches.is_present("row-major") {
        Some(MatrixLayout::RowMajor)
    } else if matches.is_present("col-major") {
        Some(MatrixLayout::ColumnMajor)
    } else { None };

    let mut spvs = matches.values_of_os("INPUT")
        .into_iter()
        .flatten()
        .flat_map(collect_spirv_binaries)
        .collect::<Vec<_>>();
    if spvs.is_empty() {
        return Err(failure::err_msg("no spir-v module is found"));
    }
    // Keep the stage order of a pipeline.
    spvs.sort_by_key(|(name, spv)| (spv.stage().exec_model(), name.clone()));

    if let Some(layout) = layout {
        let conv = LayoutConverter::new();
        let mut converted = Vec::with_capacity(spvs.len());
        for (name, spv) in spvs {
            match conv.convert_binary(&spv, layout) {
                Some(spv) => converted.push((name, spv)),
                None => return Err(failure::format_err!(
                    "unable to convert '{}' to {:?}", name, layout)),
            }
        }
        spvs = converted;
        if let Some(out_dir) = matches.value_of_os("out") {
            save_spirv_binaries(Path::new(out_dir), &spvs)?;
        }
    } else if matches.is_present("out") {
        warn!("nothing is rewritten, `--out` is ignored");
    }

    let spvs = spvs.into_iter()
        .map(|(name, spv)| {
            info!("using '{}' as {:?} stage", name, spv.stage());
            spv
        })
        .collect::<Vec<_>>();
    let pipe = PipelineInterface::new(&spvs, vert_bind_point, PipelineLayoutConfig::new())?;
    print_interface(&pipe);
    Ok(())
}

fn collect_spirv_binaries(path: &OsStr) -> Vec<(String, SpirvBinary)> {
    let path = Path::new(path);
    let paths = if path.is_dir() {
        match read_dir(path) {
            Ok(entries) => entries
                .filter_map(|x| match x {
                    Ok(rv) => Some(rv.path()),
                    Err(err) => {
                        warn!("cannot access to filesystem item: {}", err);
                        None
                    },
                })
                .filter(|x| x.is_file() && x.extension() == Some(OsStr::new("spv")))
                .collect::<Vec<_>>(),
            Err(err) => {
                warn!("cannot read directory '{}': {}", path.display(), err);
                Vec::new()
            },
        }
    } else {
        vec![path.to_owned()]
    };
    paths.into_iter()
        .filter_map(|x| {
            let spv = match SpirvBinary::load(&x) {
                Ok(spv) => spv,
                Err(err) => {
                    warn!("unable to load '{}': {}", x.display(), err);
                    return None;
                },
            };
            let name = x.file_stem()
                .and_then(OsStr::to_str)
                .map(ToOwned::to_owned)?;
            Some((name, spv))
        })
        .collect()
}

fn save_spirv_binaries(out_dir: &Path, spvs: &[(String, SpirvBinary)]) -> Result<(), failure::Error> {
    create_dir_all(out_dir)?;
    for (name, spv) in spvs {
        let mut path = PathBuf::from(out_dir);
        path.push(format!("{}.spv", name));
        spv.save(&path)?;
        info!("saved '{}'", path.display());
    }
    Ok(())
}

fn print_interface(pipe: &PipelineInterface) {
    let stages = pipe.stages().iter()
        .map(|(stage, _)| stage.short_name())
        .collect::<Vec<_>>();
    println!("stages: {}", stages.join(", "));

    println!("descriptor sets:");
    for set_layout in pipe.layout().set_layouts() {
        println!("  set {}:", set_layout.set);
        for bind in set_layout.binds.iter() {
            println!("    binding {}: {:?} x{} ({:?})", bind.bind_point, bind.desc_ty,
                bind.ndesc, bind.stage);
        }
    }

    println!("push constants:");
    for rng in pipe.layout().push_const_rngs() {
        println!("  offset {} size {} ({:?})", rng.offset, rng.size, rng.stage_flags);
    }

    if let Some(vert_input) = pipe.vert_input() {
        println!("vertex input:");
        if let Some(bind) = vert_input.bind() {
            println!("  binding {}: stride {}", bind.binding, bind.stride);
        }
        for (attr, name) in vert_input.attrs().iter().zip(vert_input.attr_names()) {
            println!("    location {} '{}': {:?} at {}", attr.location, name, attr.format,
                attr.offset);
        }
    }

    println!("uniform blocks:");
    for name in pipe.index().gather_block_names() {
        let view = pipe.uniform_block(&name);
        println!("  {} ({} bytes):", view.name(), view.size());
        for member in view.members() {
            println!("    {} at {} ({} bytes)", member.name, member.offset, member.nbyte);
        }
    }
}
