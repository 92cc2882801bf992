//! ランダム分類器 $t$ 個の最大正解数に関する統計的ベースラインの計算
//!
//! データセットの $n$ 問それぞれに正答確率を与えたとき，1個のランダム分類器の
//! 正解数はPoisson二項分布に従う．本クレートは独立な $t$ 個の分類器のうち
//! 最大の正解数（最大値順序統計量）の分布と期待値，およびp値を計算する．

pub mod probability;
pub mod poisson_binomial;
pub mod max_order_statistic;
pub mod baseline;
pub mod compare_theoretical;

use std::{self, fmt};
extern crate rayon;
use rayon::prelude::*;
extern crate simple_excel_writer;
use simple_excel_writer as xlsx;
use simple_excel_writer::{Row, sheet::ToCellValue};

pub use probability::SuccessProb;
pub use poisson_binomial::PoissonBinomial;
pub use max_order_statistic::MaxOrderStatisticPoissonBinomial;
pub use baseline::{max_random_baseline, max_random_pmf, max_random_F, max_random_p_value};


/// ベースライン計算に関するエラー
#[derive(Debug, Clone)]
pub struct BaselineError {
    pub message: String,
}

impl fmt::Display for BaselineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BaselineError {
    fn description(&self) -> &str {
        &self.message
    }
}


/// 台が $\{0, 1, \ldots, n\}$ の離散分布を計算するトレイト
pub trait DiscreteDistribution: Sync {
    /// 確率質量関数 $Pr\{X = k\}$ を計算
    ///
    /// # 引数
    /// * `k` - 正解数．台の範囲 $0 \leq k \leq n$ のみ有効．
    fn pmf(&self, k: usize) -> f64;

    /// 累積分布関数 $Pr\{X \leq k\}$ を計算
    ///
    /// # 引数
    /// * `k` - 正解数．台の範囲 $0 \leq k \leq n$ のみ有効．
    fn cdf(&self, k: usize) -> f64;

    /// 台の上限すなわち問題数 $n$
    fn max_k(&self) -> usize;

    /// 各種パラメータをタプルで出力する
    /// 全てのパラメータが浮動小数点数で出力される点に注意．
    fn param_to_tuple(&self) -> Vec<(String, f64)>;

    /// pmfとcdfを計算し，(k, pmf(k), cdf(k))のタプルを返す
    ///
    /// # 引数
    /// * `k` - 正解数
    fn pmf_tuple(&self, k: usize) -> (usize, f64, f64) {
        let f_k = self.pmf(k);
        let cdf_k = self.cdf(k);
        (k, f_k, cdf_k)
    }


    /// 台の全ての点を列挙する
    fn support(&self) -> Vec<usize> {
        (0..=self.max_k()).collect::<Vec<usize>>()
    }

    /// 複数個の正解数に対して確率質量関数を計算
    ///
    /// # 引数
    /// * `ks` - 正解数の組
    fn map_pmf(&self, ks: &[usize]) -> Vec<f64> {
        ks.par_iter()
          .map(|k| self.pmf(*k))
          .collect::<Vec<f64>>()
    }


    /// 台の全域についてpmfとcdfをまとめて計算
    /// 返り値のタプルは(k, pmf(k), cdf(k))を意味する
    fn overview(&self) -> Vec<(usize, f64, f64)> {
        let vec_k = self.support();
        vec_k.par_iter()
             .map(|k| self.pmf_tuple(*k))
             .collect::<Vec<(usize, f64, f64)>>()
    }

    /// 台の全域におけるpmfとcdfをExcelファイルで保存
    ///
    /// # 引数
    /// * `xlsx_path` - 保存先のExcelファイルパス
    fn overview_to_excel(&self, xlsx_path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let overview = self.overview();
        let params = self.param_to_tuple();

        let mut wb = xlsx::Workbook::create(xlsx_path);
        let mut sheet_1 = wb.create_sheet("Calculated Value");

        wb.write_sheet(&mut sheet_1, |sheet_writer| {
            sheet_writer.append_row(xlsx::row!["k", "Pr(X=k)", "Pr(X<=k)"])?;
            for (k, f_k, cdf_k) in overview.iter() {
               sheet_writer.append_row(xlsx::row![(*k as f64).to_cell_value(), f_k.to_cell_value(), cdf_k.to_cell_value()])?;
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
}

/// 一様な正答確率の場合に二項分布の理論値と比較可能
pub trait CompareBinomial: DiscreteDistribution {
    /// 同条件の二項分布（statrsによる理論値）を生成する
    fn same_condition_binomial(&self) -> Result<compare_theoretical::TheoreticalBinomial, BaselineError>;

    /// 正解数 k に対して，Selfと二項分布の両者でpmfを比較する
    ///
    /// # 引数
    /// * `k` - 正解数
    ///
    /// # 返り値
    /// * `(k, self_pmf, binom_pmf)` - 確率質量関数の値
    ///     * `self_pmf` - Selfで計算されたpmf
    ///     * `binom_pmf` - statrsの二項分布で計算されたpmf
    fn compare_binomial(&self, k: usize) -> Result<(usize, f64, f64), BaselineError> {
        let binom = self.same_condition_binomial()?;
        let binom_pmf = binom.pmf(k);
        let self_pmf = self.pmf(k);
        Ok((k, self_pmf, binom_pmf))
    }
}
