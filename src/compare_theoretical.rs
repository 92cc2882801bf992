//! 理論値との比較
//!
//! 正答確率が一様な場合，Poisson二項分布は二項分布 $B(n, p)$ に一致する．
//! statrsの二項分布を理論値として，畳み込みによる計算結果の検証に用いる．

extern crate statrs;
use statrs::distribution::{Binomial, Discrete, DiscreteCDF};
extern crate rayon;
use rayon::prelude::*;
extern crate simple_excel_writer;
use simple_excel_writer as xlsx;
use simple_excel_writer::{Row, sheet::ToCellValue};

use super::{BaselineError, DiscreteDistribution, CompareBinomial};
use super::poisson_binomial::PoissonBinomial;


/// 二項分布の理論値
///
/// statrsの[`Binomial`]をラップし，[`DiscreteDistribution`]として扱えるようにする．
pub struct TheoreticalBinomial {
    n: usize,
    p: f64,
    binomial: Binomial,
}

impl TheoreticalBinomial {
    /// 試行回数と成功確率から理論値計算用のインスタンスを生成
    ///
    /// # 引数
    /// * `n` - 試行回数
    /// * `p` - 成功確率
    pub fn new(n: usize, p: f64) -> Result<Self, BaselineError> {
        let binomial = Binomial::new(p, n as u64)
            .map_err(|e| BaselineError { message: e.to_string() })?;
        Ok(TheoreticalBinomial { n, p, binomial })
    }
}


impl DiscreteDistribution for TheoreticalBinomial {
    fn pmf(&self, k: usize) -> f64 {
        if k > self.n {
            0.0
        } else {
            self.binomial.pmf(k as u64)
        }
    }

    fn cdf(&self, k: usize) -> f64 {
        if k > self.n {
            1.0
        } else {
            self.binomial.cdf(k as u64)
        }
    }

    fn max_k(&self) -> usize {
        self.n
    }

    fn param_to_tuple(&self) -> Vec<(String, f64)> {
        vec![
            ("n".to_string(), self.n as f64),
            ("p".to_string(), self.p)
        ]
    }
}


/// 台の全域についてpmfとcdfを理論値と比較
///
/// # 引数
/// * `dist` - 比較対象の分布
///
/// # 返り値
/// * `Vec<(k, self_pmf, binom_pmf, self_cdf, binom_cdf)>`
///     * `self_pmf` / `self_cdf` - 比較対象で計算された値
///     * `binom_pmf` / `binom_cdf` - statrsの二項分布で計算された理論値
pub fn compare_overview<D: CompareBinomial>(dist: &D) -> Result<Vec<(usize, f64, f64, f64, f64)>, BaselineError> {
    let binom = dist.same_condition_binomial()?;
    let vec_k = dist.support();
    let rows = vec_k.par_iter()
                    .map(|k| (*k, dist.pmf(*k), binom.pmf(*k), dist.cdf(*k), binom.cdf(*k)))
                    .collect::<Vec<(usize, f64, f64, f64, f64)>>();
    Ok(rows)
}


/// 理論値との比較結果をExcelファイルで保存
///
/// # 引数
/// * `dist` - 比較対象の分布
/// * `xlsx_path` - 保存先のExcelファイルパス
pub fn compare_overview_to_excel<D: CompareBinomial>(dist: &D, xlsx_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let overview = compare_overview(dist)?;
    let params = dist.param_to_tuple();

    let mut wb = xlsx::Workbook::create(xlsx_path);
    let mut sheet_1 = wb.create_sheet("Calculated Value");

    wb.write_sheet(&mut sheet_1, |sheet_writer| {
        sheet_writer.append_row(xlsx::row!["k", "pmf", "pmf(理論値)", "cdf", "cdf(理論値)", "pmf誤差"])?;
        for (k, self_pmf, binom_pmf, self_cdf, binom_cdf) in overview.iter() {
            let diff = self_pmf - binom_pmf;
            sheet_writer.append_row(xlsx::row![
                (*k as f64).to_cell_value(),
                self_pmf.to_cell_value(),
                binom_pmf.to_cell_value(),
                self_cdf.to_cell_value(),
                binom_cdf.to_cell_value(),
                diff.to_cell_value()
            ])?;
        }
        Ok(())
    })?;

    let mut sheet_2 = wb.create_sheet("Parameters");

    wb.write_sheet(&mut sheet_2, |sheet_writer| {
        sheet_writer.append_row(xlsx::row!["Parameter", "Value"])?;
        for (p, v) in params.iter() {
            sheet_writer.append_row(xlsx::row![p.to_cell_value(), v.to_cell_value()])?;
        }
        Ok(())
    })?;

    Ok(())
}


/// 二項分布の理論値との比較を実行
pub fn compare_with_binomial(n: usize, p: f64) {
    println!("start compare with binomial for n = {}, p = {}", n, p);
    let pb = PoissonBinomial::new(&vec![p; n]).unwrap();
    let rows = compare_overview(&pb).unwrap();
    println!("{:?}", rows);

    println!("{:?}", pb.param_to_tuple());
}
