use argh::FromArgs;
use tensorgrad::prelude::*;

/// Builds a small gradient graph and prints the gradients of its leaves
#[derive(Debug, FromArgs)]
struct Args {
    /// seed of the random constructors
    #[argh(option, short = 's', default = "random::DEFAULT_SEED")]
    seed: u64,

    /// number of rows of the inputs
    #[argh(option, short = 'r', default = "2")]
    rows: usize,

    /// number of columns of the inputs
    #[argh(option, short = 'c', default = "3")]
    cols: usize,

    /// element kind: float32, float64, int8, int16, int32 or int64
    #[argh(option, short = 'd', default = "DType::F32", from_str_fn(parse_dtype))]
    dtype: DType,
}

fn parse_dtype(value: &str) -> Result<DType, String> {
    match value {
        "float32" => Ok(DType::F32),
        "float64" => Ok(DType::F64),
        "int8" => Ok(DType::I8),
        "int16" => Ok(DType::I16),
        "int32" => Ok(DType::I32),
        "int64" => Ok(DType::I64),
        _ => Err(format!("unsupported dtype: {value}")),
    }
}

fn print_grad<T: Element>(name: &str, tensor: &Tensor<T>) {
    match tensor.grad() {
        Some(grad) => println!("d{name} = {grad}"),
        None => println!("d{name} = none"),
    }
}

fn run<T: Element>(rows: usize, cols: usize) -> Result<(), TensorOpsError> {
    let x = Tensor::<T>::uniform(&[rows, cols], true);
    let y = Tensor::<T>::randn(&[rows, cols], true);
    let b = Tensor::<T>::ones(&[cols], true);
    println!("x = {x}");
    println!("y = {y}");
    println!("b = {b}");

    // z = x * y + b, then flattened in column-major order
    let z = x.mul(&y)?.add(&b.broadcast_to(&[rows as isize, cols as isize])?)?;
    let flat = z.transpose(&[1, 0])?.reshape(&[(rows * cols) as isize])?;
    println!("z = {flat}");
    log::info!("graph root: {flat:?}");

    flat.backward()?;

    print_grad("x", &x);
    print_grad("y", &y);
    print_grad("b", &b);

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();
    random::set_seed(args.seed);
    log::info!("running with {args:?}");

    match args.dtype {
        DType::F32 => run::<f32>(args.rows, args.cols)?,
        DType::F64 => run::<f64>(args.rows, args.cols)?,
        DType::I8 => run::<i8>(args.rows, args.cols)?,
        DType::I16 => run::<i16>(args.rows, args.cols)?,
        DType::I32 => run::<i32>(args.rows, args.cols)?,
        DType::I64 => run::<i64>(args.rows, args.cols)?,
    }

    Ok(())
}
