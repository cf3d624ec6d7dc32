//! Renders a small demo chart and writes it through every export path.
//!
//! Usage: plot_export_demo [--out DIR] [--title TEXT] [--legend POS]

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use plotkit::core::LinePlot;
use plotkit::plot::{AxisPos, PlotPos};
use plotkit::render::Color;
use plotkit::{Plot, PlotResult};

#[derive(Debug)]
struct CliArgs {
    out_dir: PathBuf,
    title: String,
    legend: Option<String>,
}

fn parse_args() -> Result<CliArgs, String> {
    let mut out_dir = PathBuf::from(".");
    let mut title = String::from("plotkit export demo");
    let mut legend = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => {
                out_dir = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or("--out requires a directory")?;
            }
            "--title" => {
                title = args.next().ok_or("--title requires a value")?;
            }
            "--legend" => {
                legend = Some(args.next().ok_or("--legend requires a position name")?);
            }
            "--help" | "-h" => {
                return Err("usage: plot_export_demo [--out DIR] [--title TEXT] [--legend POS]"
                    .to_owned());
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(CliArgs {
        out_dir,
        title,
        legend,
    })
}

fn build_demo_plot(title: &str) -> Plot {
    let n = 200;
    let xs: Vec<f64> = (0..n).map(|i| f64::from(i) * 0.1).collect();
    let damped: Vec<f64> = xs.iter().map(|x| (x / 4.0).exp() * x.sin()).collect();
    let envelope: Vec<f64> = xs.iter().map(|x| (x / 4.0).exp()).collect();

    let mut plot = Plot::new();
    plot.set_title(title);

    let mut series = LinePlot::from_xy(&xs, &damped, "e^{x/4} sin(x)", Color::rgb(0.1, 0.3, 0.8));
    series.thickness = 1.5;
    plot.add_plot(
        Box::new(series),
        AxisPos::XBottom,
        AxisPos::YLeft,
        PlotPos::Top,
        true,
    );

    let envelope_series = LinePlot::from_xy(&xs, &envelope, "envelope", Color::rgb(0.8, 0.2, 0.2));
    plot.add_plot(
        Box::new(envelope_series),
        AxisPos::XBottom,
        AxisPos::YLeft,
        PlotPos::Top,
        true,
    );

    if let Some(axis) = plot.axis_mut(AxisPos::XBottom, PlotPos::Top) {
        axis.set_label("time [s]");
    }
    if let Some(axis) = plot.axis_mut(AxisPos::YLeft, PlotPos::Top) {
        axis.set_label("amplitude");
    }

    plot
}

fn run(args: &CliArgs) -> PlotResult<()> {
    let mut plot = build_demo_plot(&args.title);
    if let Some(name) = &args.legend {
        if !plot.set_legend_location(name) {
            eprintln!("ignoring unknown legend position: {name}");
        }
    }

    fs::create_dir_all(&args.out_dir)?;

    let svg_path = args.out_dir.join("chart.svg");
    let mut svg = fs::File::create(&svg_path)?;
    plot.render_to_svg(&mut svg, 800.0, 500.0)?;
    println!("wrote {}", svg_path.display());

    let tsv_path = args.out_dir.join("chart.tsv");
    let mut tsv = fs::File::create(&tsv_path)?;
    plot.write_data_as_text('\t', &mut tsv, false, true)?;
    println!("wrote {}", tsv_path.display());

    #[cfg(feature = "cairo-backend")]
    {
        let png_path = args.out_dir.join("chart.png");
        plot.render_to_png(&png_path, 800, 500)?;
        println!("wrote {}", png_path.display());

        let pdf_path = args.out_dir.join("chart.pdf");
        plot.render_to_pdf(&pdf_path, 800.0, 500.0)?;
        println!("wrote {}", pdf_path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let _ = plotkit::telemetry::init_default_tracing();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("export failed: {err}");
            ExitCode::FAILURE
        }
    }
}
